use crate::error::FastqError;

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

pub fn looks_like_gzip<R: Read + Seek>(mut r: R) -> io::Result<bool> {
    let mut magic = [0u8; 2];
    let pos = r.stream_position()?;
    let n = r.read(&mut magic)?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(n >= 2 && magic == [0x1F, 0x8B])
}

pub fn open_file(path: &Path) -> io::Result<File> {
    File::open(path)
}

pub(crate) fn has_gz_extension(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Output stream for the CLI: stdout, a plain file, or a gzip file chosen by
/// the `.gz` extension.
pub enum Output {
    Stdout(io::Stdout),
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Output {
    /// `None` means stdout.
    pub fn create(path: Option<&Path>) -> Result<Self, FastqError> {
        let Some(path) = path else {
            return Ok(Self::Stdout(io::stdout()));
        };
        let f = File::create(path).map_err(|e| FastqError::create_err(e, path))?;
        let f = BufWriter::with_capacity(256 * 1024, f);
        if has_gz_extension(path) {
            Ok(Self::Gzip(GzEncoder::new(f, Compression::default())))
        } else {
            Ok(Self::Plain(f))
        }
    }

    /// Flush and, for gzip, write the trailer. Dropping a gzip output without
    /// calling this loses write errors.
    pub fn finish(self) -> Result<(), FastqError> {
        match self {
            Self::Stdout(mut s) => s.flush(),
            Self::Plain(mut f) => f.flush(),
            Self::Gzip(enc) => enc.finish().and_then(|mut f| f.flush()),
        }
        .map_err(FastqError::write_err)
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(s) => s.write(buf),
            Self::Plain(f) => f.write(buf),
            Self::Gzip(enc) => enc.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(s) => s.flush(),
            Self::Plain(f) => f.flush(),
            Self::Gzip(enc) => enc.flush(),
        }
    }
}

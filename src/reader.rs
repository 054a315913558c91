use crate::error::{FastqError, IoContext};
use crate::record::FastqRecord;
use crate::util::{has_gz_extension, looks_like_gzip, open_file};

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Source {
    Path(PathBuf),
    Stdin,
    Reader,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Stdin => f.write_str("stdin"),
            Self::Reader => f.write_str("<reader>"),
        }
    }
}

/// Sync FASTQ decoder (plain/.gz), streaming, four lines per record.
pub struct FastqReader {
    src: Source,
    rdr: Box<dyn BufRead + Send>,
    line_num: u64,
    byte_pos: u64,
    // set once the stream ended mid-record; later reads report end of stream
    exhausted: bool,
}

impl FastqReader {
    /// Open from a file path. Auto-detect `.gz` by extension or magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FastqError> {
        let path = path.as_ref();
        let f = open_file(path).map_err(|e| FastqError::open_err(e, path))?;

        let is_gz = has_gz_extension(path) || looks_like_gzip(&f).unwrap_or(false);

        let rdr: Box<dyn BufRead + Send> = if is_gz {
            #[cfg(feature = "gzip")]
            {
                let dec = flate2::read::MultiGzDecoder::new(f);
                Box::new(BufReader::with_capacity(256 * 1024, dec))
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(FastqError::open_err(
                    io::Error::new(io::ErrorKind::Unsupported, "gzip support not enabled"),
                    path,
                ));
            }
        } else {
            #[cfg(feature = "mmap")]
            {
                use memmap2::Mmap;
                // Cursor owns the map, so the reader stays 'static
                let mmap = unsafe { Mmap::map(&f) }.map_err(|e| FastqError::open_err(e, path))?;
                Box::new(io::Cursor::new(mmap))
            }
            #[cfg(not(feature = "mmap"))]
            {
                Box::new(BufReader::with_capacity(256 * 1024, f))
            }
        };

        Ok(Self::with_source(Source::Path(path.to_path_buf()), rdr))
    }

    /// Wrap an arbitrary `BufRead`.
    pub fn from_bufread<R: BufRead + Send + 'static>(reader: R) -> Self {
        Self::with_source(Source::Reader, Box::new(reader))
    }

    pub fn stdin() -> Self {
        Self::with_source(
            Source::Stdin,
            Box::new(BufReader::with_capacity(256 * 1024, io::stdin())),
        )
    }

    fn with_source(src: Source, rdr: Box<dyn BufRead + Send>) -> Self {
        Self {
            src,
            rdr,
            line_num: 0,
            byte_pos: 0,
            exhausted: false,
        }
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    /// Decode the next record into `rec`, reusing its buffer.
    ///
    /// Returns `Ok(true)` for a record and `Ok(false)` when the stream ended
    /// cleanly on a record boundary. If the stream ends after one to three
    /// lines, `FastqError::Truncated` is returned, `rec` holds the partial
    /// tail and must not be written, and every later call returns `Ok(false)`.
    pub fn read_into(&mut self, rec: &mut FastqRecord) -> Result<bool, FastqError> {
        rec.clear();
        if self.exhausted {
            return Ok(false);
        }
        for slot in 0..4 {
            let n = self
                .rdr
                .read_until(b'\n', &mut rec.buf)
                .map_err(|e| FastqError::read_err(e, self.ctx()))?;
            if n == 0 {
                self.exhausted = true;
                if slot == 0 {
                    return Ok(false);
                }
                return Err(FastqError::Truncated {
                    lines: slot,
                    ctx: self.ctx(),
                });
            }
            self.line_num += 1;
            self.byte_pos += n as u64;
            if rec.buf.last() == Some(&b'\n') {
                rec.buf.pop();
            }
            rec.ends[slot] = rec.buf.len();
        }
        Ok(true)
    }

    /// Iterator-style `next`, allocating a fresh record each time.
    pub fn next_record(&mut self) -> Option<Result<FastqRecord, FastqError>> {
        let mut rec = FastqRecord::with_capacity(512);
        match self.read_into(&mut rec) {
            Ok(true) => Some(Ok(rec)),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }

    #[inline]
    pub fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

impl Iterator for FastqReader {
    type Item = Result<FastqRecord, FastqError>;
    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

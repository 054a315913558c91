#![cfg(feature = "async")]

use crate::error::{FastqError, IoContext};
use crate::reader::Source;
use crate::record::FastqRecord;

use async_compression::tokio::bufread::GzipDecoder;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::io::{AsyncReadExt, AsyncSeekExt, SeekFrom};

/// Async FASTQ decoder (plain/.gz), same four-line contract as
/// [`FastqReader`](crate::FastqReader).
pub struct AsyncFastqReader {
    src: Source,
    rdr: Box<dyn AsyncBufRead + Unpin + Send>,
    line_num: u64,
    byte_pos: u64,
    exhausted: bool,
}

impl AsyncFastqReader {
    /// Open async from path; `.gz` auto-detect by extension or magic bytes.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FastqError> {
        let path = path.as_ref().to_path_buf();
        let mut f = File::open(&path)
            .await
            .map_err(|e| FastqError::open_err(e, &path))?;

        let is_gz = path.extension().and_then(|s| s.to_str()) == Some("gz")
            || looks_like_gzip_async(&mut f).await.unwrap_or(false);

        let rdr: Box<dyn AsyncBufRead + Unpin + Send> = if is_gz {
            let mut gz = GzipDecoder::new(BufReader::with_capacity(256 * 1024, f));
            gz.multiple_members(true);
            Box::new(BufReader::with_capacity(256 * 1024, gz))
        } else {
            Box::new(BufReader::with_capacity(256 * 1024, f))
        };

        Ok(Self::with_source(Source::Path(path), rdr))
    }

    /// Wrap any async `AsyncBufRead`.
    pub fn from_async_bufread<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        Self::with_source(Source::Reader, Box::new(reader))
    }

    fn with_source(src: Source, rdr: Box<dyn AsyncBufRead + Unpin + Send>) -> Self {
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

    /// See [`FastqReader::read_into`](crate::FastqReader::read_into).
    pub async fn read_into(&mut self, rec: &mut FastqRecord) -> Result<bool, FastqError> {
        rec.clear();
        if self.exhausted {
            return Ok(false);
        }
        for slot in 0..4 {
            let n = self
                .rdr
                .read_until(b'\n', &mut rec.buf)
                .await
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

    /// Fetch next record (async).
    pub async fn next_record(&mut self) -> Option<Result<FastqRecord, FastqError>> {
        let mut rec = FastqRecord::with_capacity(512);
        match self.read_into(&mut rec).await {
            Ok(true) => Some(Ok(rec)),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

async fn looks_like_gzip_async(f: &mut File) -> io::Result<bool> {
    let pos = f.stream_position().await?;
    let mut magic = [0u8; 2];
    let n = f.read(&mut magic).await?;
    f.seek(SeekFrom::Start(pos)).await?;
    Ok(n >= 2 && magic == [0x1F, 0x8B])
}

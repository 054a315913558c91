use crate::error::FastqError;
use crate::record::FastqRecord;

use std::io::{BufWriter, Write};

/// Buffered FASTQ encoder.
///
/// Each line goes out exactly as it was decoded, followed by `\n`.
pub struct FastqWriter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> FastqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            out: BufWriter::with_capacity(64 * 1024, inner),
        }
    }

    pub fn write_record(&mut self, rec: &FastqRecord) -> Result<(), FastqError> {
        for line in rec.lines() {
            self.out.write_all(line).map_err(FastqError::write_err)?;
            self.out.write_all(b"\n").map_err(FastqError::write_err)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), FastqError> {
        self.out.flush().map_err(FastqError::write_err)
    }

    /// Flush and hand back the underlying stream.
    pub fn into_inner(self) -> Result<W, FastqError> {
        self.out
            .into_inner()
            .map_err(|e| FastqError::write_err(e.into_error()))
    }
}

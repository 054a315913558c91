//! Decode → filter → encode.

use crate::error::FastqError;
use crate::filter::{Disposition, FilterConfig, Mode};
use crate::histogram::LengthHistogram;
use crate::policy::{Execution, PipelineOptions, TruncationPolicy};
use crate::reader::FastqReader;
use crate::record::FastqRecord;
use crate::staged;
use crate::writer::FastqWriter;

use std::io::{self, Write};

/// Non-fatal conditions met during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Input ended after `lines` lines of a record; the tail was dropped.
    TruncatedRecord { lines: usize, line_num: u64 },
    /// `min > max` outside Inspect mode.
    InvertedRange { min: usize, max: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TruncatedRecord { lines, line_num } => write!(
                f,
                "input ended after {lines} of 4 lines of a record (line {line_num}); partial record dropped"
            ),
            Self::InvertedRange { min, max } => {
                write!(f, "minimum length {min} exceeds maximum length {max}")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Complete records decoded.
    pub decoded: u64,
    /// Records written to the main output.
    pub written: u64,
    /// Records the filter turned away (Keep/Discard only).
    pub rejected: u64,
    pub histogram: LengthHistogram,
    pub warnings: Vec<Warning>,
}

/// A length filter bound to its run options.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: FilterConfig,
    opts: PipelineOptions,
}

impl Pipeline {
    pub fn new(config: FilterConfig, opts: PipelineOptions) -> Self {
        Self { config, opts }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Whether lengths are counted for this run.
    pub(crate) fn observes(&self) -> bool {
        self.opts.histogram || self.config.mode == Mode::Inspect
    }

    /// Run to the end of `reader`, writing surviving records to `out`.
    ///
    /// `out` is flushed but not closed; finishing a compressed stream is up
    /// to the caller.
    pub fn run<W>(
        &self,
        reader: &mut FastqReader,
        out: &mut FastqWriter<W>,
    ) -> Result<RunSummary, FastqError>
    where
        W: Write + Send,
    {
        self.execute(reader, out, None::<&mut FastqWriter<io::Sink>>)
    }

    /// Like [`run`](Self::run), additionally writing rejected records to
    /// `rejects`.
    pub fn run_with_rejects<W, X>(
        &self,
        reader: &mut FastqReader,
        out: &mut FastqWriter<W>,
        rejects: &mut FastqWriter<X>,
    ) -> Result<RunSummary, FastqError>
    where
        W: Write + Send,
        X: Write + Send,
    {
        self.execute(reader, out, Some(rejects))
    }

    fn execute<W, X>(
        &self,
        reader: &mut FastqReader,
        out: &mut FastqWriter<W>,
        rejects: Option<&mut FastqWriter<X>>,
    ) -> Result<RunSummary, FastqError>
    where
        W: Write + Send,
        X: Write + Send,
    {
        let mut warnings = Vec::new();
        if self.config.is_inverted() && self.config.mode != Mode::Inspect {
            let w = Warning::InvertedRange {
                min: self.config.min_len,
                max: self.config.max_len,
            };
            log::warn!("{w}");
            warnings.push(w);
        }

        let mut summary = match self.opts.execution {
            Execution::Direct => self.run_direct(reader, out, rejects)?,
            Execution::Staged { queue_capacity } => {
                staged::run(self, queue_capacity, reader, out, rejects)?
            }
        };
        warnings.append(&mut summary.warnings);
        summary.warnings = warnings;

        log::info!(
            "{} records read, {} written, {} rejected",
            summary.decoded,
            summary.written,
            summary.rejected
        );
        Ok(summary)
    }

    fn run_direct<W, X>(
        &self,
        reader: &mut FastqReader,
        out: &mut FastqWriter<W>,
        mut rejects: Option<&mut FastqWriter<X>>,
    ) -> Result<RunSummary, FastqError>
    where
        W: Write,
        X: Write,
    {
        let observe = self.observes();
        let mut summary = RunSummary::default();
        // single-threaded, so one scratch record is safe to reuse
        let mut rec = FastqRecord::with_capacity(1024);

        loop {
            match reader.read_into(&mut rec) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    summary.warnings.extend(self.on_decode_error(err)?);
                    break;
                }
            }
            summary.decoded += 1;
            let len = rec.seq_len();
            if observe {
                summary.histogram.record(len);
            }
            match self.config.disposition(len) {
                Disposition::Write => {
                    out.write_record(&rec)?;
                    summary.written += 1;
                }
                Disposition::Reject => {
                    if let Some(w) = rejects.as_deref_mut() {
                        w.write_record(&rec)?;
                    }
                    summary.rejected += 1;
                }
                Disposition::Observe => {}
            }
        }

        out.flush()?;
        if let Some(w) = rejects {
            w.flush()?;
        }
        Ok(summary)
    }

    /// Truncation becomes a warning under `Warn`; everything else is fatal.
    pub(crate) fn on_decode_error(&self, err: FastqError) -> Result<Option<Warning>, FastqError> {
        match err {
            FastqError::Truncated { lines, ctx } if self.opts.truncation == TruncationPolicy::Warn => {
                let w = Warning::TruncatedRecord {
                    lines,
                    line_num: ctx.line_num,
                };
                log::warn!("{w}");
                Ok(Some(w))
            }
            err => Err(err),
        }
    }
}

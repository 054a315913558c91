//! Virtual gel: streaming FASTQ size selection.
//!
//! - Plain and `.gz` input (auto-detect) and output.
//! - Four lines per record, no content validation, byte-exact output.
//! - Keep, discard or inspect records by sequence length, with an optional
//!   length histogram.
//! - Direct single-threaded loop, or a staged decoder/filter/encoder pipeline
//!   over bounded queues.
//! - Optional async decoder behind the `async` feature.
//!
//! ```
//! use std::io::Cursor;
//! use vgel::{FastqReader, FastqWriter, FilterConfig, Mode, Pipeline, PipelineOptions};
//!
//! let input = "@a\nACGT\n+\n!!!!\n@b\nAC\n+\n!!\n";
//! let mut reader = FastqReader::from_bufread(Cursor::new(input));
//! let mut writer = FastqWriter::new(Vec::new());
//! let pipeline = Pipeline::new(FilterConfig::new(3, 10, Mode::Keep), PipelineOptions::default());
//!
//! let summary = pipeline.run(&mut reader, &mut writer).unwrap();
//! assert_eq!(summary.written, 1);
//! assert_eq!(writer.into_inner().unwrap(), b"@a\nACGT\n+\n!!!!\n");
//! ```

pub mod error;
pub mod filter;
pub mod histogram;
pub mod pipeline;
pub mod policy;
pub mod reader;
pub mod record;
mod staged;
pub mod util;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_reader;

pub use crate::error::{FastqError, IoContext};
pub use crate::filter::{Disposition, FilterConfig, Mode, keep};
pub use crate::histogram::{LengthHistogram, LengthSnapshot};
pub use crate::pipeline::{Pipeline, RunSummary, Warning};
pub use crate::policy::{
    DEFAULT_QUEUE_CAPACITY, Execution, MAX_QUEUE_CAPACITY, PipelineOptions, TruncationPolicy,
};
pub use crate::reader::{FastqReader, Source};
pub use crate::record::FastqRecord;
pub use crate::util::Output;
pub use crate::writer::FastqWriter;

#[cfg(feature = "async")]
pub use crate::async_reader::AsyncFastqReader;

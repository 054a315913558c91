use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Position in the input stream when an error was raised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoContext {
    pub byte_pos: u64,
    pub line_num: u64,
}

#[derive(Debug, Error)]
pub enum FastqError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("read error at {ctx:?}: {source}")]
    Read {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("write error: {source}")]
    Write {
        #[source]
        source: io::Error,
    },
    #[error("input ended after {lines} of 4 record lines at {ctx:?}")]
    Truncated { lines: usize, ctx: IoContext },
    #[error("{} is named more than once among input, output and save files", path.display())]
    SameInputOutput { path: PathBuf },
    #[error("{stage} stage panicked")]
    StagePanicked { stage: &'static str },
}

impl FastqError {
    pub(crate) fn open_err(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn create_err(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn read_err(source: io::Error, ctx: IoContext) -> Self {
        Self::Read { source, ctx }
    }
    pub(crate) fn write_err(source: io::Error) -> Self {
        Self::Write { source }
    }

    /// True for the end-of-input-mid-record case, which callers usually
    /// downgrade to a warning.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

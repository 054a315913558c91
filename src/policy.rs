/// Default depth of each inter-stage queue in the staged pipeline.
pub const DEFAULT_QUEUE_CAPACITY: usize = 400;

/// Larger requested capacities are clamped to this. Channel slots are
/// allocated up front, so the ceiling bounds memory as well.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 16;

/// What to do when the input ends in the middle of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationPolicy {
    /// Drop the partial tail, log a warning and finish normally.
    Warn,
    /// Fail the run with `FastqError::Truncated`.
    Fail,
}

/// How the pipeline is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Decode, filter and write on the calling thread.
    Direct,
    /// Decoder, filter and encoder on their own threads joined by bounded
    /// queues of `queue_capacity` records, clamped to
    /// `1..=MAX_QUEUE_CAPACITY`.
    Staged { queue_capacity: usize },
}

impl Execution {
    pub fn staged() -> Self {
        Self::Staged {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub execution: Execution,
    /// Count every decoded record's length. Inspect mode counts regardless.
    pub histogram: bool,
    pub truncation: TruncationPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            execution: Execution::Direct,
            histogram: false,
            truncation: TruncationPolicy::Warn,
        }
    }
}

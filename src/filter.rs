//! Length predicate and mode dispatch.

/// What the pipeline does with records once their length is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Write records whose length falls inside `[min, max]`.
    Keep,
    /// Write records whose length falls outside `[min, max]`.
    Discard,
    /// Write nothing; only observe lengths.
    Inspect,
}

/// Outcome of the filter for a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Write,
    Reject,
    Observe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    pub min_len: usize,
    pub max_len: usize,
    pub mode: Mode,
}

impl FilterConfig {
    /// `min_len > max_len` is accepted; Keep then writes nothing and Discard
    /// writes everything.
    pub fn new(min_len: usize, max_len: usize, mode: Mode) -> Self {
        Self {
            min_len,
            max_len,
            mode,
        }
    }

    #[inline]
    pub fn in_range(&self, len: usize) -> bool {
        len >= self.min_len && len <= self.max_len
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.min_len > self.max_len
    }

    /// Whether a record of this length is written. Always false in Inspect.
    #[inline]
    pub fn keep(&self, len: usize) -> bool {
        match self.mode {
            Mode::Keep => self.in_range(len),
            Mode::Discard => !self.in_range(len),
            Mode::Inspect => false,
        }
    }

    #[inline]
    pub fn disposition(&self, len: usize) -> Disposition {
        match self.mode {
            Mode::Inspect => Disposition::Observe,
            _ if self.keep(len) => Disposition::Write,
            _ => Disposition::Reject,
        }
    }
}

/// Free-function form of [`FilterConfig::keep`].
#[inline]
pub fn keep(len: usize, config: &FilterConfig) -> bool {
    config.keep(len)
}

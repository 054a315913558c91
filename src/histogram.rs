use std::collections::HashMap;

/// Counts of observed sequence lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthHistogram {
    counts: HashMap<usize, u64>,
}

impl LengthHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, len: usize) {
        *self.counts.entry(len).or_insert(0) += 1;
    }

    /// Fold another partial histogram into this one.
    pub fn merge(&mut self, other: &LengthHistogram) {
        for (&len, &n) in &other.counts {
            *self.counts.entry(len).or_insert(0) += n;
        }
    }

    pub fn count(&self, len: usize) -> u64 {
        self.counts.get(&len).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct lengths seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sorted view of the counts as of now. Later `record` calls do not
    /// affect an existing snapshot.
    pub fn snapshot(&self) -> LengthSnapshot {
        let mut pairs: Vec<(usize, u64)> = self.counts.iter().map(|(&l, &n)| (l, n)).collect();
        pairs.sort_unstable_by_key(|&(len, _)| len);
        LengthSnapshot { pairs }
    }
}

/// `(length, count)` pairs in ascending length order, zero counts omitted.
/// Iterate it as many times as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthSnapshot {
    pairs: Vec<(usize, u64)>,
}

impl LengthSnapshot {
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn min_length(&self) -> Option<usize> {
        self.pairs.first().map(|&(len, _)| len)
    }

    pub fn max_length(&self) -> Option<usize> {
        self.pairs.last().map(|&(len, _)| len)
    }
}

impl<'a> IntoIterator for &'a LengthSnapshot {
    type Item = (usize, u64);
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, (usize, u64)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter().copied()
    }
}

/// One FASTQ unit: identifier, sequence, separator and quality lines.
///
/// The four lines live back to back in a single buffer without their `\n`
/// terminators, so a record can be cleared and refilled without giving its
/// allocation back. Nothing about the content is checked: a header without
/// `@` or a quality line of the wrong length is carried as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastqRecord {
    pub(crate) buf: Vec<u8>,
    pub(crate) ends: [usize; 4],
}

impl FastqRecord {
    pub fn new(head: &[u8], seq: &[u8], sep: &[u8], qual: &[u8]) -> Self {
        let mut rec = Self::with_capacity(head.len() + seq.len() + sep.len() + qual.len());
        for (slot, line) in [head, seq, sep, qual].into_iter().enumerate() {
            rec.buf.extend_from_slice(line);
            rec.ends[slot] = rec.buf.len();
        }
        rec
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
            ends: [0; 4],
        }
    }

    #[inline]
    pub fn head(&self) -> &[u8] {
        &self.buf[..self.ends[0]]
    }
    #[inline]
    pub fn seq(&self) -> &[u8] {
        &self.buf[self.ends[0]..self.ends[1]]
    }
    #[inline]
    pub fn sep(&self) -> &[u8] {
        &self.buf[self.ends[1]..self.ends[2]]
    }
    #[inline]
    pub fn qual(&self) -> &[u8] {
        &self.buf[self.ends[2]..self.ends[3]]
    }

    /// Lines in file order.
    pub fn lines(&self) -> [&[u8]; 4] {
        [self.head(), self.seq(), self.sep(), self.qual()]
    }

    /// Sequence length as used by the filter. A trailing `\r` left over from
    /// CRLF input is not counted.
    #[inline]
    pub fn seq_len(&self) -> usize {
        let seq = self.seq();
        match seq.last() {
            Some(b'\r') => seq.len() - 1,
            _ => seq.len(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seq_len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq_len() == 0
    }

    /// Drop the content but keep the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.ends = [0; 4];
    }
}

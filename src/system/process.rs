use serde::Serialize;

/// One process as seen during a single scan. Nothing links samples across
/// scans; a pid seen twice is two unrelated samples.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessSample {
    pub pid: u32,
    pub rss_kb: u64,
    pub command: String,
}

/// Collection that refuses samples once `capacity` is reached.
#[derive(Debug)]
pub struct ProcessBuffer {
    samples: Vec<ProcessSample>,
    capacity: usize,
}

impl ProcessBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Returns `false` and drops the sample when the buffer is full.
    pub fn push(&mut self, sample: ProcessSample) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples.push(sample);
        true
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    pub fn into_vec(self) -> Vec<ProcessSample> {
        self.samples
    }
}

/// Orders samples by resident memory, largest first, and keeps `limit`.
///
/// The sort is stable: samples with equal RSS stay in enumeration order.
pub fn rank_by_rss(mut samples: Vec<ProcessSample>, limit: usize) -> Vec<ProcessSample> {
    samples.sort_by(|a, b| b.rss_kb.cmp(&a.rss_kb));
    samples.truncate(limit);
    samples
}

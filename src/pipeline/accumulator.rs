//! Append-only sample buffer for one run of the fingerprint stage.

use crate::defaults::SAMPLE_RATE;

/// Accumulates every sample seen since the stage last started.
///
/// Appends are amortized O(1) per sample. The buffer only shrinks on
/// [`release`](Self::release), which also returns its storage.
#[derive(Debug, Default)]
pub struct AudioAccumulator {
    samples: Vec<f32>,
}

impl AudioAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenates `chunk` onto the buffer. Empty chunks are fine.
    pub fn append(&mut self, chunk: &[f32]) {
        self.samples.extend_from_slice(chunk);
    }

    /// Number of accumulated samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Accumulated duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }

    /// Everything accumulated so far.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// The first `count` samples, or `None` if fewer have been accumulated.
    pub fn prefix(&self, count: usize) -> Option<&[f32]> {
        self.samples.get(..count)
    }

    /// Drops the buffer and frees its storage. Idempotent.
    pub fn release(&mut self) {
        self.samples = Vec::new();
    }

    /// Currently allocated capacity, in samples.
    pub fn capacity(&self) -> usize {
        self.samples.capacity()
    }
}

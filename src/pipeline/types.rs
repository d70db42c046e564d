//! Data types flowing through the fingerprint pipeline.

use crate::defaults::SAMPLE_RATE;

/// A chunk of mono 32-bit float samples at 11025 Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioChunk {
    /// PCM samples.
    pub samples: Vec<f32>,
    /// Sequence number for ordering.
    pub sequence: u64,
}

impl AudioChunk {
    /// Creates a new audio chunk.
    pub fn new(samples: Vec<f32>, sequence: u64) -> Self {
        Self { samples, sequence }
    }

    /// Duration of the chunk in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }
}

/// Result of one code generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintResult {
    /// The code string.
    pub code: String,
    /// Number of samples the code was computed over.
    pub sample_count: usize,
}

impl FingerprintResult {
    pub fn new(code: String, sample_count: usize) -> Self {
        Self { code, sample_count }
    }

    /// Covered duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.sample_count as f64 / SAMPLE_RATE as f64
    }
}

/// Lifecycle state of the fingerprint stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not started, or stopped.
    Idle,
    /// Accumulating audio.
    Running,
    /// Final code posted, buffer released. Terminal until the next start.
    Done,
}

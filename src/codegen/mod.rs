//! Code generation: turns a prefix of PCM samples into a fingerprint code.
//!
//! The stage treats code generation as an opaque, non-incremental function
//! and recomputes from scratch on every trigger.

pub mod spectral;

pub use spectral::{CodeEntry, SpectralCodegen, decode_code};

use crate::error::{EchoprintError, Result};
use std::sync::{Arc, Mutex};

/// Trait for fingerprint code generators.
///
/// This trait allows swapping implementations (real codegen vs mock).
pub trait Codegen: Send + Sync {
    /// Compute a code over `samples` (mono f32 at 11025 Hz).
    ///
    /// Must be deterministic for identical input.
    fn generate(&self, samples: &[f32]) -> Result<String>;

    /// Name of the generator, for diagnostics.
    fn name(&self) -> &str;
}

/// Implement Codegen for Arc<T> to allow sharing across runs.
impl<T: Codegen + ?Sized> Codegen for Arc<T> {
    fn generate(&self, samples: &[f32]) -> Result<String> {
        (**self).generate(samples)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Mock code generator for testing
///
/// Returns `"<prefix>:<sample count>"` and records the length of every call.
#[derive(Debug, Clone)]
pub struct MockCodegen {
    prefix: String,
    should_fail: bool,
    calls: Arc<Mutex<Vec<usize>>>,
}

impl MockCodegen {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            should_fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure the mock to fail on generate
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Sample counts of every call so far, in call order.
    pub fn calls(&self) -> Vec<usize> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Codegen for MockCodegen {
    fn generate(&self, samples: &[f32]) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(samples.len());
        }
        if self.should_fail {
            Err(EchoprintError::Fingerprint {
                message: "mock codegen failure".to_string(),
            })
        } else {
            Ok(format!("{}:{}", self.prefix, samples.len()))
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

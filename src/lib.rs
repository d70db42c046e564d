//! echoprint-stage - inline audio stage that posts Echoprint-style codes
//!
//! Observes 11025 Hz mono float audio, forwards it untouched, and once enough
//! has arrived posts a fingerprint code as an out-of-band message.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod app;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod codegen;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;

// Host boundary
pub use audio::{AudioSource, WavAudioSource, WavPassthroughSink};
pub use codegen::{Codegen, MockCodegen, SpectralCodegen};

// Pipeline
pub use pipeline::{
    EchoprintMessage, EchoprintStation, Pipeline, PipelineConfig, PipelineHandle, RunState,
};

// Error handling
pub use error::{EchoprintError, Result};

// Config
pub use config::{Config, StageConfig, StageSettings};

// Station framework
pub use pipeline::error::{ErrorReporter, StationError};
pub use pipeline::station::Station;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

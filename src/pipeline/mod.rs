//! Fingerprint pipeline.
//!
//! The echoprint station runs in its own thread between an audio source and
//! a pass-through sink, connected by bounded crossbeam channels for
//! backpressure. Posted messages travel on a separate channel.

pub mod accumulator;
pub mod echoprint_station;
pub mod emitter;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod station;
pub mod trigger;
pub mod types;

pub use accumulator::AudioAccumulator;
pub use echoprint_station::EchoprintStation;
pub use emitter::FingerprintEmitter;
pub use error::{ErrorReporter, LogReporter, NullReporter, StationError};
pub use message::EchoprintMessage;
pub use orchestrator::{Pipeline, PipelineConfig, PipelineHandle, PipelineReport};
pub use station::{Station, StationRunner};
pub use trigger::{Advance, TriggerPolicy};
pub use types::{AudioChunk, FingerprintResult, RunState};

//! Host-side audio boundary: where chunks come from and where forwarded
//! chunks go.

pub mod source;
pub mod wav;

pub use source::{AudioSource, MockAudioSource, StreamFormat};
pub use wav::{WavAudioSource, WavPassthroughSink};

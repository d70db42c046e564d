//! Default configuration constants for echoprint-stage.
//!
//! Shared between the configuration file, the runtime settings handle and
//! the stage itself so the numbers live in exactly one place.

/// Sample rate of every chunk the stage accepts, in Hz.
///
/// Echoprint code generation is defined over 11025 Hz mono float audio.
/// Anything else is rejected at the host boundary.
pub const SAMPLE_RATE: u32 = 11025;

/// Number of channels the stage accepts.
pub const CHANNELS: u16 = 1;

/// Bits per sample of the accepted format (IEEE float).
pub const BITS_PER_SAMPLE: u16 = 32;

/// Default fingerprint window in seconds.
pub const MAX_SECONDS: u32 = 30;

/// Smallest accepted value for `max_seconds`.
pub const MIN_MAX_SECONDS: u32 = 10;

/// Largest accepted value for `max_seconds`.
pub const MAX_MAX_SECONDS: u32 = 120;

/// Spacing of the thresholds in interval mode, in seconds.
///
/// Also the first threshold: interval mode fires at 10 s, 20 s, ... up to
/// `max_seconds`.
pub const INTERVAL_SECONDS: u32 = 10;

/// Samples per chunk handed to the stage by the file source.
pub const CHUNK_SAMPLES: usize = 1024;

/// Capacity of the channels between pipeline threads.
pub const CHANNEL_CAPACITY: usize = 32;

/// Structure name of the posted fingerprint message.
pub const MESSAGE_NAME: &str = "echoprint";

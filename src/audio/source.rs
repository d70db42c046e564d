use crate::defaults;
use crate::error::{EchoprintError, Result};
use std::fmt;

/// Trait for audio sources feeding the stage.
///
/// This trait allows swapping implementations (WAV file vs mock).
pub trait AudioSource: Send {
    /// Start delivering audio.
    fn start(&mut self) -> Result<()>;

    /// Stop delivering audio.
    fn stop(&mut self) -> Result<()>;

    /// Read the next chunk of mono f32 samples at 11025 Hz.
    ///
    /// An empty vector means the stream has ended.
    fn read_samples(&mut self) -> Result<Vec<f32>>;
}

/// Format of an audio stream, as negotiated at the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub float: bool,
}

impl StreamFormat {
    /// The only format the stage accepts: 11025 Hz mono 32-bit float.
    pub const STAGE: StreamFormat = StreamFormat {
        sample_rate: defaults::SAMPLE_RATE,
        channels: defaults::CHANNELS,
        bits_per_sample: defaults::BITS_PER_SAMPLE,
        float: true,
    };

    /// Fails with `AudioFormatMismatch` unless `self` is the stage format.
    pub fn negotiate(&self) -> Result<()> {
        if *self == Self::STAGE {
            Ok(())
        } else {
            Err(EchoprintError::AudioFormatMismatch {
                expected: Self::STAGE.to_string(),
                actual: self.to_string(),
            })
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = match self.channels {
            1 => "mono".to_string(),
            2 => "stereo".to_string(),
            n => format!("{} channels", n),
        };
        let kind = if self.float { "f" } else { "i" };
        write!(
            f,
            "{} Hz {} {}{}",
            self.sample_rate, channels, kind, self.bits_per_sample
        )
    }
}

/// Mock audio source for testing
///
/// Serves a fixed list of chunks in order, then end-of-stream.
#[derive(Debug, Clone, Default)]
pub struct MockAudioSource {
    is_started: bool,
    chunks: Vec<Vec<f32>>,
    position: usize,
    should_fail_read: bool,
}

impl MockAudioSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the chunks to serve
    pub fn with_chunks(mut self, chunks: Vec<Vec<f32>>) -> Self {
        self.chunks = chunks;
        self
    }

    /// Serve `total` samples of `value` split into `chunk_size` chunks
    pub fn with_constant(mut self, value: f32, total: usize, chunk_size: usize) -> Self {
        let mut chunks = Vec::new();
        let mut remaining = total;
        while remaining > 0 {
            let n = chunk_size.min(remaining);
            chunks.push(vec![value; n]);
            remaining -= n;
        }
        self.chunks = chunks;
        self
    }

    /// Configure the mock to fail on read
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Check if the audio source is started
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<f32>> {
        if self.should_fail_read {
            return Err(EchoprintError::AudioRead {
                message: "mock audio error".to_string(),
            });
        }
        match self.chunks.get(self.position) {
            Some(chunk) => {
                self.position += 1;
                Ok(chunk.clone())
            }
            None => Ok(Vec::new()),
        }
    }
}

//! WAV file audio source and pass-through sink.

use crate::audio::source::{AudioSource, StreamFormat};
use crate::defaults::CHUNK_SAMPLES;
use crate::error::{EchoprintError, Result};
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

/// Audio source that reads from WAV file data.
///
/// Only 11025 Hz mono 32-bit float files are accepted. The stage never
/// resamples or converts, so anything else fails negotiation.
pub struct WavAudioSource {
    samples: Vec<f32>,
    position: usize,
    chunk_size: usize,
}

impl WavAudioSource {
    /// Create from any reader (for testing/flexibility).
    pub fn from_reader(reader: Box<dyn Read + Send>) -> Result<Self> {
        let wav_reader = hound::WavReader::new(reader).map_err(|e| EchoprintError::AudioRead {
            message: format!("Failed to parse WAV file: {}", e),
        })?;

        let spec = wav_reader.spec();
        StreamFormat {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            float: spec.sample_format == hound::SampleFormat::Float,
        }
        .negotiate()?;

        let samples = wav_reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EchoprintError::AudioRead {
                message: format!("Failed to read WAV samples: {}", e),
            })?;

        Ok(Self {
            samples,
            position: 0,
            chunk_size: CHUNK_SAMPLES,
        })
    }

    /// Open a WAV file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(Box::new(std::io::BufReader::new(file)))
    }

    /// Create from stdin.
    pub fn from_stdin() -> Result<Self> {
        use std::io::Cursor;

        // Read all data from stdin into memory first (StdinLock is not Send)
        let mut buffer = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .map_err(|e| EchoprintError::AudioRead {
                message: format!("Failed to read from stdin: {}", e),
            })?;

        Self::from_reader(Box::new(Cursor::new(buffer)))
    }

    /// Sets the number of samples served per read.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Total number of samples in the file.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the file in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / StreamFormat::STAGE.sample_rate as f64
    }
}

impl AudioSource for WavAudioSource {
    fn start(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<f32>> {
        if self.position >= self.samples.len() {
            return Ok(Vec::new());
        }

        let end = std::cmp::min(self.position + self.chunk_size, self.samples.len());
        let chunk = self.samples[self.position..end].to_vec();
        self.position = end;

        Ok(chunk)
    }
}

/// Writes forwarded chunks to a WAV file in the stage format.
pub struct WavPassthroughSink {
    writer: hound::WavWriter<BufWriter<File>>,
    written: usize,
}

impl WavPassthroughSink {
    pub fn create(path: &Path) -> Result<Self> {
        let format = StreamFormat::STAGE;
        let spec = hound::WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: format.bits_per_sample,
            sample_format: hound::SampleFormat::Float,
        };
        let writer = hound::WavWriter::create(path, spec).map_err(|e| EchoprintError::AudioWrite {
            message: format!("Failed to create {}: {}", path.display(), e),
        })?;
        Ok(Self { writer, written: 0 })
    }

    /// Append one chunk.
    pub fn write_chunk(&mut self, samples: &[f32]) -> Result<()> {
        for &sample in samples {
            self.writer
                .write_sample(sample)
                .map_err(|e| EchoprintError::AudioWrite {
                    message: e.to_string(),
                })?;
        }
        self.written += samples.len();
        Ok(())
    }

    /// Samples written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush the header and close the file.
    pub fn finish(self) -> Result<usize> {
        self.writer.finalize().map_err(|e| EchoprintError::AudioWrite {
            message: e.to_string(),
        })?;
        Ok(self.written)
    }
}

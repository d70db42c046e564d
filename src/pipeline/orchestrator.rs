//! Wires an audio source, the fingerprint station and a pass-through sink.
//!
//! ```text
//! source thread ──chunks──▶ echoprint station ──chunks──▶ drain thread
//!                                  │
//!                                  └──messages──▶ handle.messages()
//! ```

use crate::audio::source::AudioSource;
use crate::audio::wav::WavPassthroughSink;
use crate::codegen::Codegen;
use crate::config::StageSettings;
use crate::defaults;
use crate::error::{EchoprintError, Result};
use crate::pipeline::echoprint_station::EchoprintStation;
use crate::pipeline::emitter::FingerprintEmitter;
use crate::pipeline::error::{ErrorReporter, LogReporter, StationError};
use crate::pipeline::message::EchoprintMessage;
use crate::pipeline::station::StationRunner;
use crate::pipeline::types::AudioChunk;
use crossbeam_channel::{Receiver, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Capacity of the source → station channel.
    pub input_buffer: usize,
    /// Capacity of the station → sink channel.
    pub output_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_buffer: defaults::CHANNEL_CAPACITY,
            output_buffer: defaults::CHANNEL_CAPACITY,
        }
    }
}

/// Totals collected once the pipeline has drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Chunks read from the source.
    pub chunks_read: u64,
    /// Chunks that came out of the station.
    pub chunks_forwarded: u64,
    /// Samples that came out of the station.
    pub samples_forwarded: usize,
}

/// Handle to a running pipeline.
pub struct PipelineHandle {
    running: Arc<AtomicBool>,
    messages: Receiver<EchoprintMessage>,
    source_thread: JoinHandle<Result<u64>>,
    station: StationRunner<EchoprintStation>,
    drain_thread: JoinHandle<Result<(u64, usize)>>,
}

impl PipelineHandle {
    /// Messages posted by the stage. Iteration ends once the stage has shut down.
    pub fn messages(&self) -> &Receiver<EchoprintMessage> {
        &self.messages
    }

    /// Returns true until stop has been requested.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Asks the source to stop reading. Chunks already in flight still drain.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Waits for every thread to finish and returns the totals.
    pub fn wait(self) -> Result<PipelineReport> {
        let chunks_read = self
            .source_thread
            .join()
            .map_err(|_| EchoprintError::Other("Audio source thread panicked".to_string()))??;
        self.station.join().map_err(EchoprintError::Other)?;
        let (chunks_forwarded, samples_forwarded) = self
            .drain_thread
            .join()
            .map_err(|_| EchoprintError::Other("Drain thread panicked".to_string()))??;

        Ok(PipelineReport {
            chunks_read,
            chunks_forwarded,
            samples_forwarded,
        })
    }

    /// Stops the pipeline and waits for it.
    pub fn stop(self) -> Result<PipelineReport> {
        self.request_stop();
        self.wait()
    }
}

/// Single-stage fingerprint pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
    passthrough: Option<WavPassthroughSink>,
}

impl Pipeline {
    /// Creates a new pipeline with the default error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter::default()),
            passthrough: None,
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Writes forwarded audio to a WAV file.
    pub fn with_passthrough(mut self, sink: WavPassthroughSink) -> Self {
        self.passthrough = Some(sink);
        self
    }

    /// Starts the pipeline.
    ///
    /// # Arguments
    /// * `audio_source` - Where chunks come from; an empty read ends the stream
    /// * `settings` - Stage configuration, read when the stage starts
    /// * `codegen` - Code generator invoked on each trigger
    pub fn start<A: AudioSource + 'static>(
        self,
        mut audio_source: A,
        settings: StageSettings,
        codegen: Arc<dyn Codegen>,
    ) -> Result<PipelineHandle> {
        let running = Arc::new(AtomicBool::new(true));

        let (input_tx, input_rx) = bounded::<AudioChunk>(self.config.input_buffer);
        let (output_tx, output_rx) = bounded::<AudioChunk>(self.config.output_buffer);
        let (message_tx, message_rx) = unbounded();

        let station = EchoprintStation::new(settings, FingerprintEmitter::new(codegen, message_tx))
            .with_reporter(self.error_reporter.clone());
        let runner = StationRunner::spawn(station, input_rx, output_tx, self.error_reporter.clone());

        audio_source.start()?;

        let source_running = running.clone();
        let source_reporter = self.error_reporter.clone();
        let source_thread = thread::spawn(move || -> Result<u64> {
            let mut sequence = 0u64;
            let outcome = loop {
                if !source_running.load(Ordering::SeqCst) {
                    break Ok(());
                }
                let samples = match audio_source.read_samples() {
                    Ok(samples) => samples,
                    Err(e) => {
                        source_reporter.report("source", &StationError::Fatal(e.to_string()));
                        break Err(e);
                    }
                };
                if samples.is_empty() {
                    break Ok(());
                }
                // Blocking send: a file source must not drop audio
                if input_tx.send(AudioChunk::new(samples, sequence)).is_err() {
                    break Ok(());
                }
                sequence += 1;
            };
            drop(input_tx);
            audio_source.stop()?;
            outcome.map(|()| sequence)
        });

        let mut passthrough = self.passthrough;
        let drain_thread = thread::spawn(move || -> Result<(u64, usize)> {
            let mut chunks = 0u64;
            let mut samples = 0usize;
            for chunk in output_rx.iter() {
                if let Some(sink) = passthrough.as_mut() {
                    sink.write_chunk(&chunk.samples)?;
                }
                chunks += 1;
                samples += chunk.samples.len();
            }
            if let Some(sink) = passthrough {
                sink.finish()?;
            }
            Ok((chunks, samples))
        });

        Ok(PipelineHandle {
            running,
            messages: message_rx,
            source_thread,
            station: runner,
            drain_thread,
        })
    }
}

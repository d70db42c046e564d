//! Pass-through station that posts fingerprint codes once enough audio arrived.

use crate::config::StageSettings;
use crate::error::Result;
use crate::pipeline::accumulator::AudioAccumulator;
use crate::pipeline::emitter::FingerprintEmitter;
use crate::pipeline::error::{ErrorReporter, NullReporter, StationError};
use crate::pipeline::station::Station;
use crate::pipeline::trigger::{Advance, TriggerPolicy};
use crate::pipeline::types::{AudioChunk, FingerprintResult, RunState};
use std::sync::Arc;

/// Station that observes audio and posts `echoprint` messages.
///
/// Every chunk is forwarded unmodified. While running, chunks are also
/// accumulated; when the accumulated duration reaches the pending threshold
/// the threshold-aligned prefix is fingerprinted and one message is posted.
/// At most one trigger fires per chunk, so thresholds fire in order.
pub struct EchoprintStation {
    settings: StageSettings,
    emitter: FingerprintEmitter,
    accumulator: AudioAccumulator,
    policy: TriggerPolicy,
    state: RunState,
    reporter: Arc<dyn ErrorReporter>,
}

impl EchoprintStation {
    /// Creates an idle station. Settings are read on each [`start`](Self::start).
    pub fn new(settings: StageSettings, emitter: FingerprintEmitter) -> Self {
        let policy = TriggerPolicy::new(&settings.snapshot());
        Self {
            settings,
            emitter,
            accumulator: AudioAccumulator::new(),
            policy,
            state: RunState::Idle,
            reporter: Arc::new(NullReporter),
        }
    }

    /// Sets the diagnostic sink.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Begins a run with the current settings and an empty buffer.
    pub fn start(&mut self) {
        let config = self.settings.snapshot();
        self.policy.initialize(&config);
        self.accumulator.release();
        self.state = RunState::Running;
        self.reporter.debug(
            "echoprint",
            &format!(
                "start: interval={} max_seconds={} first threshold={}s codegen={}",
                config.interval,
                config.max_seconds,
                self.policy.next_threshold_secs(),
                self.emitter.codegen_name()
            ),
        );
    }

    /// Releases the buffer and returns to idle. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.accumulator.release();
        self.policy.initialize(&self.settings.snapshot());
        if self.state != RunState::Idle {
            self.reporter.debug("echoprint", "stop");
        }
        self.state = RunState::Idle;
    }

    /// Accumulates one chunk and fires at most one trigger.
    ///
    /// Returns the result that was posted, if any. Outside `Running` the
    /// chunk is ignored.
    pub fn process_samples(&mut self, samples: &[f32]) -> Result<Option<FingerprintResult>> {
        if self.state != RunState::Running {
            return Ok(None);
        }

        self.accumulator.append(samples);
        let duration = self.accumulator.duration_secs();
        if !self.policy.should_trigger(duration) {
            return Ok(None);
        }

        let threshold = self.policy.next_threshold_secs();
        let count = self.policy.samples_to_use();
        let result = self.emitter.compute(self.accumulator.samples(), count)?;
        self.reporter.debug(
            "echoprint",
            &format!(
                "threshold {}s reached at {:.3}s, fingerprinted {} samples",
                threshold, duration, count
            ),
        );
        if !self.emitter.notify(result.clone()) {
            self.reporter.debug("echoprint", "no listener for message");
        }

        if self.policy.advance() == Advance::Finished {
            self.accumulator.release();
            self.state = RunState::Done;
            self.reporter.debug("echoprint", "done, buffer released");
        }

        Ok(Some(result))
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Samples currently held.
    pub fn buffered_samples(&self) -> usize {
        self.accumulator.len()
    }

    /// Accumulated duration in seconds.
    pub fn buffered_secs(&self) -> f64 {
        self.accumulator.duration_secs()
    }

    pub fn next_threshold_secs(&self) -> u32 {
        self.policy.next_threshold_secs()
    }

    /// Handle for changing the configuration from another thread.
    pub fn settings(&self) -> &StageSettings {
        &self.settings
    }
}

impl Station for EchoprintStation {
    type Input = AudioChunk;
    type Output = AudioChunk;

    fn name(&self) -> &'static str {
        "echoprint"
    }

    fn start(&mut self) -> std::result::Result<(), StationError> {
        EchoprintStation::start(self);
        Ok(())
    }

    fn process(
        &mut self,
        chunk: AudioChunk,
    ) -> std::result::Result<Option<AudioChunk>, StationError> {
        self.process_samples(&chunk.samples)?;
        Ok(Some(chunk))
    }

    fn shutdown(&mut self) {
        self.stop();
    }
}

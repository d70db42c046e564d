//! Decides when the fingerprint stage computes a code.

use crate::config::StageConfig;
use crate::defaults::{INTERVAL_SECONDS, SAMPLE_RATE};

/// Outcome of [`TriggerPolicy::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Another threshold is pending.
    Continue,
    /// No further triggers this run.
    Finished,
}

/// Threshold state for one run.
///
/// Single-shot mode has one threshold at `max_seconds`. Interval mode starts
/// at 10 s and steps by 10 s, firing on every threshold up to and including
/// `max_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerPolicy {
    interval: bool,
    max_seconds: u32,
    next_threshold_secs: u32,
}

impl TriggerPolicy {
    /// Builds the initial state for a run.
    pub fn new(config: &StageConfig) -> Self {
        let mut policy = Self {
            interval: config.interval,
            max_seconds: config.max_seconds,
            next_threshold_secs: 0,
        };
        policy.initialize(config);
        policy
    }

    /// Resets the threshold for a fresh run.
    pub fn initialize(&mut self, config: &StageConfig) {
        self.interval = config.interval;
        self.max_seconds = config.max_seconds;
        self.next_threshold_secs = if config.interval {
            INTERVAL_SECONDS
        } else {
            config.max_seconds
        };
    }

    /// Next duration boundary, in seconds.
    pub fn next_threshold_secs(&self) -> u32 {
        self.next_threshold_secs
    }

    pub fn is_interval(&self) -> bool {
        self.interval
    }

    /// True once `duration_secs` has reached the pending threshold.
    pub fn should_trigger(&self, duration_secs: f64) -> bool {
        duration_secs >= self.next_threshold_secs as f64
    }

    /// Samples the code is computed over: exactly the threshold-aligned
    /// prefix, whatever the buffer has overrun.
    pub fn samples_to_use(&self) -> usize {
        self.next_threshold_secs as usize * SAMPLE_RATE as usize
    }

    /// Moves past the threshold that just fired.
    pub fn advance(&mut self) -> Advance {
        if !self.interval {
            return Advance::Finished;
        }
        self.next_threshold_secs += INTERVAL_SECONDS;
        if self.next_threshold_secs > self.max_seconds {
            Advance::Finished
        } else {
            Advance::Continue
        }
    }
}

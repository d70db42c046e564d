//! Command-line application entry points.
//!
//! Orchestrates the fingerprint flow:
//! read WAV → echoprint stage → pass-through sink, printing posted codes

use crate::audio::wav::{WavAudioSource, WavPassthroughSink};
use crate::codegen::SpectralCodegen;
use crate::config::{Config, StageSettings};
use crate::defaults;
use crate::error::{EchoprintError, Result};
use crate::pipeline::error::LogReporter;
use crate::pipeline::message::EchoprintMessage;
use crate::pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineReport};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options for a fingerprint run, collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct FingerprintOptions {
    /// WAV file to read, or `None` for stdin.
    pub input: Option<PathBuf>,
    /// Forces interval mode on when set.
    pub interval: bool,
    /// Overrides `stage.max_seconds`.
    pub max_seconds: Option<u32>,
    /// Overrides `audio.chunk_samples`.
    pub chunk_samples: Option<usize>,
    /// Where to write the forwarded audio.
    pub passthrough: Option<PathBuf>,
    /// Print messages as JSON.
    pub json: bool,
    /// Suppress status messages.
    pub quiet: bool,
    /// Verbosity level (0=default, 1=input details, 2=stage diagnostics).
    pub verbosity: u8,
}

/// Loads configuration from `custom_path`, or the default location.
///
/// A missing default file yields defaults; a missing custom file is an error.
/// Environment overrides are applied last.
pub fn load_config(custom_path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path()?)?,
    };
    Ok(config.with_env_overrides())
}

/// Applies command-line overrides on top of `config` and validates the result.
pub fn apply_overrides(mut config: Config, options: &FingerprintOptions) -> Result<Config> {
    if options.interval {
        config.stage.interval = true;
    }
    if let Some(seconds) = options.max_seconds {
        config.stage.max_seconds = seconds;
    }
    if let Some(chunk_samples) = options.chunk_samples {
        config.audio.chunk_samples = chunk_samples;
    }
    config.validate()?;
    Ok(config)
}

/// Formats one posted message for stdout.
pub fn format_message(message: &EchoprintMessage, json: bool) -> Result<String> {
    if json {
        message
            .to_json()
            .map_err(|e| EchoprintError::Other(format!("Failed to serialize message: {}", e)))
    } else {
        Ok(format!("{} {}", message.name().green(), message.code))
    }
}

/// Run the fingerprint command: read WAV → echoprint stage → pass-through.
///
/// Every posted message is printed to stdout as soon as it arrives. Status
/// lines go to stderr and are dropped with `quiet`.
pub fn run_fingerprint_command(
    config: Config,
    options: FingerprintOptions,
) -> Result<PipelineReport> {
    let config = apply_overrides(config, &options)?;

    let source = match options.input.as_deref() {
        Some(path) => WavAudioSource::open(path)?,
        None => WavAudioSource::from_stdin()?,
    }
    .with_chunk_size(config.audio.chunk_samples);

    if !options.quiet && options.verbosity >= 1 {
        eprintln!(
            "Input: {} ({:.1}s, {} samples)",
            options
                .input
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "stdin".to_string()),
            source.duration_secs(),
            source.len()
        );
        eprintln!(
            "Mode: {}, window {}s",
            if config.stage.interval {
                format!("every {}s", defaults::INTERVAL_SECONDS)
            } else {
                "single-shot".to_string()
            },
            config.stage.max_seconds
        );
    }

    let settings = StageSettings::new(config.stage)?;

    let mut pipeline = Pipeline::new(PipelineConfig::default())
        .with_error_reporter(Arc::new(LogReporter::new(options.verbosity)));
    if let Some(path) = options.passthrough.as_deref() {
        pipeline = pipeline.with_passthrough(WavPassthroughSink::create(path)?);
    }

    let handle = pipeline.start(source, settings, Arc::new(SpectralCodegen::new()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut posted = 0usize;
    for message in handle.messages().iter() {
        writeln!(out, "{}", format_message(&message, options.json)?)?;
        out.flush()?;
        posted += 1;
    }

    let report = handle.wait()?;

    if !options.quiet {
        let secs = report.samples_forwarded as f64 / defaults::SAMPLE_RATE as f64;
        let summary = format!(
            "Forwarded {} samples ({:.1}s) in {} chunks, {} fingerprint(s)",
            report.samples_forwarded, secs, report.chunks_forwarded, posted
        );
        if posted == 0 {
            eprintln!("{}", summary.yellow());
        } else {
            eprintln!("{}", summary.dimmed());
        }
    }

    Ok(report)
}

/// Prints the effective configuration as TOML.
pub fn show_config(custom_path: Option<&Path>) -> anyhow::Result<String> {
    let config = load_config(custom_path)?;
    Ok(config.to_toml()?)
}

/// Resolves the configuration file path that would be read.
pub fn config_path(custom_path: Option<&Path>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path(),
    }
}

//! Command-line interface for echoprint-stage
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Fingerprint a mono 11025 Hz float stream and pass the audio through
#[derive(Parser, Debug)]
#[command(
    name = "echoprint-stage",
    version,
    about = "Audio fingerprinting pass-through stage"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (fingerprints are still printed)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: input details, -vv: stage diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// WAV file to read (11025 Hz mono f32). Omit or use "-" for stdin
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Fingerprint every 10 seconds instead of once
    #[arg(long)]
    pub interval: bool,

    /// Window length in seconds (10-120)
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u32).range(10..=120))]
    pub max_seconds: Option<u32>,

    /// Samples per chunk read from the input
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(usize))]
    pub chunk_samples: Option<usize>,

    /// Write the passed-through audio to this WAV file
    #[arg(long, value_name = "PATH")]
    pub passthrough: Option<PathBuf>,

    /// Print each message as a JSON object
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Input path, or `None` when reading stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_command() {
        let cli = Cli::try_parse_from(["echoprint-stage"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.input.is_none());
        assert!(cli.input_path().is_none());
        assert!(!cli.interval);
        assert!(cli.max_seconds.is_none());
        assert!(cli.chunk_samples.is_none());
        assert!(cli.passthrough.is_none());
        assert!(!cli.json);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_verbose_double() {
        let cli = Cli::try_parse_from(["echoprint-stage", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_options() {
        let cli = Cli::try_parse_from([
            "echoprint-stage",
            "--interval",
            "--max-seconds",
            "60",
            "--chunk-samples",
            "2048",
            "--passthrough",
            "/tmp/out.wav",
            "--json",
            "song.wav",
        ])
        .unwrap();

        assert!(cli.interval);
        assert_eq!(cli.max_seconds, Some(60));
        assert_eq!(cli.chunk_samples, Some(2048));
        assert_eq!(cli.passthrough, Some(PathBuf::from("/tmp/out.wav")));
        assert!(cli.json);
        assert_eq!(cli.input_path(), Some(&PathBuf::from("song.wav")));
    }

    #[test]
    fn test_dash_input_means_stdin() {
        let cli = Cli::try_parse_from(["echoprint-stage", "-"]).unwrap();
        assert!(cli.input.is_some());
        assert!(cli.input_path().is_none());
    }

    #[test]
    fn test_max_seconds_range_is_enforced() {
        assert!(Cli::try_parse_from(["echoprint-stage", "--max-seconds", "10"]).is_ok());
        assert!(Cli::try_parse_from(["echoprint-stage", "--max-seconds", "120"]).is_ok());
        assert!(Cli::try_parse_from(["echoprint-stage", "--max-seconds", "9"]).is_err());
        assert!(Cli::try_parse_from(["echoprint-stage", "--max-seconds", "121"]).is_err());
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["echoprint-stage", "config", "show"]).unwrap();
        match cli.command {
            Some(Commands::Config { action }) => assert_eq!(action, ConfigAction::Show),
            other => panic!("Expected config command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_path_with_global_config() {
        let cli = Cli::try_parse_from([
            "echoprint-stage",
            "config",
            "path",
            "--config",
            "/etc/stage.toml",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Path
            })
        ));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/stage.toml")));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["echoprint-stage", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["echoprint-stage", "--resample"]).is_err());
    }
}

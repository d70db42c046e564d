use anyhow::Result;
use clap::{CommandFactory, Parser};
use echoprint_stage::app::{
    FingerprintOptions, config_path, load_config, run_fingerprint_command, show_config,
};
use echoprint_stage::cli::{Cli, Commands, ConfigAction};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let input = cli.input_path().cloned();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            let options = FingerprintOptions {
                input,
                interval: cli.interval,
                max_seconds: cli.max_seconds,
                chunk_samples: cli.chunk_samples,
                passthrough: cli.passthrough,
                json: cli.json,
                quiet: cli.quiet,
                verbosity: cli.verbose,
            };
            if !cli.quiet && cli.verbose >= 1 {
                eprintln!("echoprint-stage {}", echoprint_stage::version_string());
            }
            run_fingerprint_command(config, options)?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "echoprint-stage",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Handle `config` subcommands.
fn handle_config_command(
    action: ConfigAction,
    custom_path: Option<&std::path::Path>,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", show_config(custom_path)?);
        }
        ConfigAction::Path => {
            println!("{}", config_path(custom_path)?.display());
        }
    }
    Ok(())
}

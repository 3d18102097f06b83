//! Costcalc CLI
//!
//! Command-line interface for running consumption estimates.

mod commands;
mod config;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Settings;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "costcalc")]
#[command(about = "Consumption estimate runner", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout only carries results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "costcalc_cli=info,costcalc_runner=info,costcalc_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match handle_command(cli.command, &cli.settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "✗".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_estimate() {
        let cli = Cli::try_parse_from([
            "costcalc",
            "estimate",
            "--form",
            "form.json",
            "--artifact",
            "a.png",
            "--artifact",
            "b.pdf",
            "--prompt",
            "Assume HA",
        ])
        .unwrap();

        match cli.command {
            Commands::Estimate {
                form,
                artifact,
                prompt,
            } => {
                assert_eq!(form, PathBuf::from("form.json"));
                assert_eq!(artifact.len(), 2);
                assert_eq!(prompt.as_deref(), Some("Assume HA"));
            }
            _ => panic!("expected estimate command"),
        }
    }

    #[test]
    fn test_parse_global_overrides() {
        let cli = Cli::try_parse_from([
            "costcalc",
            "fetch",
            "--client",
            "acme",
            "--use-case",
            "q1",
            "--timeout",
            "60",
            "--result-poll-interval",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.settings.result_poll_interval, Some(2));
        match cli.command {
            Commands::Fetch {
                client,
                use_case,
                timeout,
            } => {
                assert_eq!(client, "acme");
                assert_eq!(use_case, "q1");
                assert_eq!(timeout, Some(60));
            }
            _ => panic!("expected fetch command"),
        }
    }

    #[test]
    fn test_upload_requires_a_path() {
        assert!(Cli::try_parse_from(["costcalc", "upload"]).is_err());
    }
}

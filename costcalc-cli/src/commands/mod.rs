//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod estimate;
mod form;
mod prompt;
mod run;
mod upload;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Settings;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Upload artifacts, run an estimate and print the result link
    Estimate {
        /// Form file (JSON) describing the estimate
        #[arg(long)]
        form: PathBuf,

        /// Image (png, jpg) or document (pdf) to attach; repeatable
        #[arg(long)]
        artifact: Vec<PathBuf>,

        /// Prompt to send instead of the one rendered from the form
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Trigger an estimation run and print its id
    Submit {
        /// Form file (JSON) describing the estimate
        #[arg(long)]
        form: PathBuf,
    },
    /// Wait for a run to terminate
    Wait {
        /// Run id returned by `submit`
        run_id: i64,
    },
    /// Wait for the result document of a client and use case
    Fetch {
        /// Client name
        #[arg(long)]
        client: String,

        /// Use case name
        #[arg(long)]
        use_case: String,

        /// Total time to wait, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Upload artifacts and print their URLs
    Upload {
        /// Images (png, jpg) or documents (pdf)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print the prompt a form renders to
    Prompt {
        /// Form file (JSON) describing the estimate
        #[arg(long)]
        form: PathBuf,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `settings` - Configuration overrides from the command line
pub async fn handle_command(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Estimate {
            form,
            artifact,
            prompt,
        } => estimate::run_estimate(settings, &form, &artifact, prompt).await,
        Commands::Submit { form } => estimate::submit(settings, &form).await,
        Commands::Wait { run_id } => run::wait(settings, run_id).await,
        Commands::Fetch {
            client,
            use_case,
            timeout,
        } => run::fetch(settings, &client, &use_case, timeout).await,
        Commands::Upload { paths } => upload::upload(settings, &paths).await,
        Commands::Prompt { form } => prompt::print_prompt(&form),
    }
}

//! Configuration module
//!
//! Loads the runner configuration and applies command-line overrides.

use anyhow::{Context, Result};
use clap::Args;
use costcalc_runner::Config;
use std::time::Duration;

/// Overrides for the runner configuration, in seconds
#[derive(Debug, Clone, Default, Args)]
pub struct Settings {
    /// Pause between run status queries
    #[arg(long, global = true, env = "COSTCALC_RUN_POLL_INTERVAL")]
    pub run_poll_interval: Option<u64>,

    /// Pause between result document reads
    #[arg(long, global = true, env = "COSTCALC_RESULT_POLL_INTERVAL")]
    pub result_poll_interval: Option<u64>,

    /// Total time to wait for the result document
    #[arg(long, global = true, env = "COSTCALC_RESULT_TIMEOUT")]
    pub result_timeout: Option<u64>,
}

impl Settings {
    /// Reads the environment, applies overrides and validates the result
    pub fn load(&self) -> Result<Config> {
        let mut config = Config::from_env().context("Failed to load configuration")?;

        if let Some(secs) = self.run_poll_interval {
            config.run_poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.result_poll_interval {
            config.result_poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.result_timeout {
            config.result_timeout = Duration::from_secs(secs);
        }

        config.validate().context("Invalid configuration")?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

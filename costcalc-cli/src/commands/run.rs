//! Run command handlers
//!
//! Waits on an existing run or its result document.

use anyhow::Result;
use colored::*;
use costcalc_core::domain::payload::RequestPayload;
use costcalc_core::domain::run::RunId;
use costcalc_runner::{Estimator, PollPolicy};
use std::time::Duration;

use crate::config::Settings;

/// Wait until a run terminates
pub async fn wait(settings: &Settings, run_id: i64) -> Result<()> {
    let config = settings.load()?;
    let estimator = Estimator::from_config(&config)?;

    estimator.wait(RunId(run_id)).await?;

    println!(
        "{}",
        format!("✓ Run {} completed successfully!", run_id)
            .green()
            .bold()
    );
    Ok(())
}

/// Wait for the result document of a client and use case
pub async fn fetch(
    settings: &Settings,
    client: &str,
    use_case: &str,
    timeout: Option<u64>,
) -> Result<()> {
    let config = settings.load()?;
    let mut estimator = Estimator::from_config(&config)?;

    if let Some(secs) = timeout {
        let interval = estimator.result_policy().interval;
        estimator =
            estimator.with_result_policy(PollPolicy::new(interval, Duration::from_secs(secs)));
    }

    let payload = RequestPayload::builder(client, use_case).build()?;
    let link = estimator.fetch(&payload).await?;

    println!("{}", "✓ Result found!".green().bold());
    println!("  Result: {}", link.cyan());
    Ok(())
}

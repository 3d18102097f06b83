//! Estimate command handlers
//!
//! Handles the form-driven commands: the full estimate and run submission.

use anyhow::{Context, Result};
use colored::*;
use costcalc_core::domain::form::FormSession;
use costcalc_runner::Estimator;
use costcalc_runner::repository::BlobArtifactStore;
use costcalc_runner::service::prepare_payload;
use std::path::{Path, PathBuf};

use super::form;
use super::upload::print_artifact;
use crate::config::Settings;

/// Run a full estimate from a form file
///
/// # Arguments
/// * `settings` - Configuration overrides
/// * `form_path` - Form file describing the estimate
/// * `artifacts` - Files to upload before triggering the run
/// * `prompt` - Prompt overriding the rendered one
pub async fn run_estimate(
    settings: &Settings,
    form_path: &Path,
    artifacts: &[PathBuf],
    prompt: Option<String>,
) -> Result<()> {
    let config = settings.load()?;
    let (form, mut session) = form::load(form_path)?;

    if let Some(prompt) = prompt.filter(|p| !p.trim().is_empty()) {
        session.set_prompt(prompt);
    }

    let payload = if artifacts.is_empty() {
        form.payload(&session).context("Invalid estimate form")?
    } else {
        let store = BlobArtifactStore::new(config.blob_client(&config.upload_container)?);
        let (payload, uploaded) = prepare_payload(&form, &mut session, &store, artifacts)
            .await
            .context("Failed to prepare estimate")?;
        for artifact in &uploaded {
            print_artifact(artifact);
        }
        payload
    };
    let estimator = Estimator::from_config(&config)?;

    println!(
        "{}",
        format!(
            "Running estimate for {} / {}...",
            payload.client_name(),
            payload.use_case_name()
        )
        .bold()
    );

    let link = estimator.estimate(&payload).await?;
    session.set_result_link(&link);

    println!("{}", "✓ Estimate ready!".green().bold());
    print_session_summary(&session);

    Ok(())
}

/// Print what went into an estimate and where its result is
fn print_session_summary(session: &FormSession) {
    for line in session_summary(session) {
        println!("  {}", line);
    }
}

fn session_summary(session: &FormSession) -> Vec<String> {
    let mut lines = vec![format!(
        "Inputs: {} image(s), {} document(s)",
        session.image_urls().len(),
        session.document_urls().len()
    )];
    if let Some(link) = session.result_link() {
        lines.push(format!("Result: {}", link));
    }
    lines
}

/// Trigger a run from a form file without waiting for it
pub async fn submit(settings: &Settings, form_path: &Path) -> Result<()> {
    let config = settings.load()?;
    let (form, session) = form::load(form_path)?;

    let payload = form.payload(&session).context("Invalid estimate form")?;
    let estimator = Estimator::from_config(&config)?;
    let run_id = estimator.submit(&payload).await?;

    println!("{}", "✓ Run triggered successfully!".green().bold());
    println!("  Run ID:     {}", run_id.to_string().cyan());
    println!("  Result at:  {}", payload.result_path().dimmed());

    Ok(())
}

//! Upload command handler

use anyhow::Result;
use colored::*;
use costcalc_core::domain::form::FormSession;
use costcalc_runner::repository::BlobArtifactStore;
use costcalc_runner::service::{ArtifactKind, UploadedArtifact, upload_artifacts};
use std::path::PathBuf;

use crate::config::Settings;

/// Upload files to the upload container and print their URLs
pub async fn upload(settings: &Settings, paths: &[PathBuf]) -> Result<()> {
    let config = settings.load()?;
    let store = BlobArtifactStore::new(config.blob_client(&config.upload_container)?);

    let mut session = FormSession::new();
    let uploaded = upload_artifacts(&store, paths, &mut session).await?;

    println!(
        "{}",
        format!("✓ Uploaded {} file(s)", uploaded.len()).green().bold()
    );
    for artifact in &uploaded {
        print_artifact(artifact);
    }

    Ok(())
}

/// Print one uploaded artifact
pub fn print_artifact(artifact: &UploadedArtifact) {
    let kind = match artifact.kind {
        ArtifactKind::Image => "image",
        ArtifactKind::Document => "document",
    };
    println!(
        "  {} {} ({})",
        "▸".cyan(),
        artifact.path.display(),
        kind.dimmed()
    );
    println!("    {}", artifact.url);
}

//! Artifact upload
//!
//! Uploads the images and documents attached to an estimate and records
//! their URLs in the form session, from where they flow into the payload.

use costcalc_core::domain::form::{EstimateForm, FormSession};
use costcalc_core::domain::payload::RequestPayload;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{EstimateError, Result};
use crate::repository::ArtifactStore;

/// What an uploaded file is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Image,
    Document,
}

impl ArtifactKind {
    /// Classifies a file by its extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        content_type(path).map(|(kind, _)| kind)
    }

    /// Folder the artifact is stored under
    pub fn folder(&self) -> &'static str {
        match self {
            ArtifactKind::Image => "uploads/images",
            ArtifactKind::Document => "uploads/pdfs",
        }
    }
}

fn content_type(path: &Path) -> Option<(ArtifactKind, &'static str)> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some((ArtifactKind::Image, "image/png")),
        "jpg" | "jpeg" => Some((ArtifactKind::Image, "image/jpeg")),
        "pdf" => Some((ArtifactKind::Document, "application/pdf")),
        _ => None,
    }
}

/// A file that has been uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub url: String,
}

struct PlannedUpload<'a> {
    source: &'a Path,
    kind: ArtifactKind,
    content_type: &'static str,
    target: String,
}

fn plan(source: &Path) -> Result<PlannedUpload<'_>> {
    let artifact_error = |message: &str| EstimateError::Artifact {
        path: source.to_path_buf(),
        message: message.to_string(),
    };

    let (kind, content_type) = content_type(source)
        .ok_or_else(|| artifact_error("unsupported file type (expected png, jpg, jpeg or pdf)"))?;
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| artifact_error("file name is not valid UTF-8"))?;

    Ok(PlannedUpload {
        source,
        kind,
        content_type,
        target: format!("{}/{}", kind.folder(), name),
    })
}

/// Uploads `files` and records their URLs in `session`
///
/// Every file is classified before the first upload, so an unsupported file
/// uploads nothing. Existing objects with the same name are replaced.
pub async fn upload_artifacts(
    store: &dyn ArtifactStore,
    files: &[PathBuf],
    session: &mut FormSession,
) -> Result<Vec<UploadedArtifact>> {
    let planned = files
        .iter()
        .map(|f| plan(f))
        .collect::<Result<Vec<_>>>()?;

    let mut uploaded = Vec::with_capacity(planned.len());
    for upload in planned {
        let body = tokio::fs::read(upload.source)
            .await
            .map_err(|e| EstimateError::Artifact {
                path: upload.source.to_path_buf(),
                message: e.to_string(),
            })?;

        let url = store
            .upload(&upload.target, body, upload.content_type)
            .await?;
        info!(file = %upload.source.display(), %url, "Artifact uploaded");

        match upload.kind {
            ArtifactKind::Image => session.add_image_url(&url),
            ArtifactKind::Document => session.add_document_url(&url),
        }
        uploaded.push(UploadedArtifact {
            path: upload.source.to_path_buf(),
            kind: upload.kind,
            url,
        });
    }

    Ok(uploaded)
}

/// Uploads `files` for `form` and builds its payload
///
/// The form is checked before anything is uploaded, so a form that cannot
/// produce a payload leaves no objects behind.
///
/// # Returns
/// The payload carrying the upload URLs, and the uploads themselves
pub async fn prepare_payload(
    form: &EstimateForm,
    session: &mut FormSession,
    store: &dyn ArtifactStore,
    files: &[PathBuf],
) -> Result<(RequestPayload, Vec<UploadedArtifact>)> {
    form.validate()?;

    let uploaded = upload_artifacts(store, files, session).await?;
    let payload = form.payload(session)?;

    Ok((payload, uploaded))
}

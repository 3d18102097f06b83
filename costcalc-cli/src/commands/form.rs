//! Form file loading

use anyhow::{Context, Result};
use costcalc_core::domain::form::{EstimateForm, FormSession};
use std::path::Path;

/// Reads a form file and settles it into a fresh session
pub fn load(path: &Path) -> Result<(EstimateForm, FormSession)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read form file: {}", path.display()))?;
    let form = EstimateForm::from_json(&json)
        .with_context(|| format!("Failed to parse form file: {}", path.display()))?;

    let mut session = FormSession::new();
    form.fill_session(&mut session);
    Ok((form, session))
}

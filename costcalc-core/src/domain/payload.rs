//! Request payload domain types
//!
//! The payload is the single parameter handed to the remote estimation job.
//! It is built once through [`PayloadBuilder`] and never mutated afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name the remote job writes its result to
pub const RESULT_FILE_NAME: &str = "result.json";

/// Errors raised while building a payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadError {
    #[error("{0} is required and cannot be empty")]
    MissingField(&'static str),

    #[error("{field} is not a valid path segment: {value}")]
    InvalidPathSegment { field: &'static str, value: String },

    #[error("market {market}: start month must be between 1 and 12, got {month}")]
    InvalidStartMonth { market: String, month: u8 },

    #[error("market {market}: multiplier must be a non-negative number, got {multiplier}")]
    InvalidMultiplier { market: String, multiplier: f64 },

    #[error("budget must be a non-negative number, got {0}")]
    InvalidBudget(f64),

    #[error("payload could not be serialized: {0}")]
    Serialization(String),
}

/// Market roll-out configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub market: String,
    pub multiplier: f64,
    pub start_month: u8,
}

impl Market {
    pub fn new(market: impl Into<String>, multiplier: f64, start_month: u8) -> Self {
        Self {
            market: market.into(),
            multiplier,
            start_month,
        }
    }

    fn validate(&self) -> Result<(), PayloadError> {
        if !(1..=12).contains(&self.start_month) {
            return Err(PayloadError::InvalidStartMonth {
                market: self.market.clone(),
                month: self.start_month,
            });
        }
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(PayloadError::InvalidMultiplier {
                market: self.market.clone(),
                multiplier: self.multiplier,
            });
        }
        Ok(())
    }
}

/// Parameters of one estimation run
///
/// Serialized as a flat JSON object and passed to the remote job as its only
/// parameter. `client_name` and `use_case_name` are guaranteed non-empty and
/// free of `/`, because the result location is derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPayload {
    image_uris: Vec<String>,
    file_uris: Vec<String>,
    client_name: String,
    use_case_name: String,
    markets: Vec<Market>,
    user_prompt: Option<String>,
    budget: Option<f64>,
}

impl RequestPayload {
    /// Starts a builder for the given client and use case
    pub fn builder(
        client_name: impl Into<String>,
        use_case_name: impl Into<String>,
    ) -> PayloadBuilder {
        PayloadBuilder::new(client_name, use_case_name)
    }

    pub fn image_uris(&self) -> &[String] {
        &self.image_uris
    }

    pub fn file_uris(&self) -> &[String] {
        &self.file_uris
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn use_case_name(&self) -> &str {
        &self.use_case_name
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn user_prompt(&self) -> Option<&str> {
        self.user_prompt.as_deref()
    }

    pub fn budget(&self) -> Option<f64> {
        self.budget
    }

    /// Location of the result document inside the result container
    pub fn result_path(&self) -> String {
        result_path(&self.client_name, &self.use_case_name)
    }

    /// Serializes the payload into the single string job parameter
    pub fn to_job_parameter(&self) -> Result<String, PayloadError> {
        serde_json::to_string(self).map_err(|e| PayloadError::Serialization(e.to_string()))
    }
}

/// Derives the result document location for a client and use case
///
/// Depends on nothing but its two arguments.
pub fn result_path(client_name: &str, use_case_name: &str) -> String {
    format!("{}/{}/{}", client_name, use_case_name, RESULT_FILE_NAME)
}

/// Builder for [`RequestPayload`]
///
/// The only way to construct a payload; [`PayloadBuilder::build`] enforces
/// every payload invariant.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    image_uris: Vec<String>,
    file_uris: Vec<String>,
    client_name: String,
    use_case_name: String,
    markets: Vec<Market>,
    user_prompt: Option<String>,
    budget: Option<f64>,
}

impl PayloadBuilder {
    pub fn new(client_name: impl Into<String>, use_case_name: impl Into<String>) -> Self {
        Self {
            image_uris: Vec::new(),
            file_uris: Vec::new(),
            client_name: client_name.into(),
            use_case_name: use_case_name.into(),
            markets: Vec::new(),
            user_prompt: None,
            budget: None,
        }
    }

    pub fn image_uri(mut self, uri: impl Into<String>) -> Self {
        self.image_uris.push(uri.into());
        self
    }

    pub fn image_uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_uris.extend(uris.into_iter().map(Into::into));
        self
    }

    pub fn file_uri(mut self, uri: impl Into<String>) -> Self {
        self.file_uris.push(uri.into());
        self
    }

    pub fn file_uris<I, S>(mut self, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_uris.extend(uris.into_iter().map(Into::into));
        self
    }

    /// Adds a market named after its position (`M1`, `M2`, ...)
    pub fn market(mut self, multiplier: f64, start_month: u8) -> Self {
        let name = format!("M{}", self.markets.len() + 1);
        self.markets.push(Market::new(name, multiplier, start_month));
        self
    }

    pub fn user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(prompt.into());
        self
    }

    pub fn budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Validates the collected fields and produces the payload
    pub fn build(self) -> Result<RequestPayload, PayloadError> {
        let client_name = validate_path_segment("client_name", self.client_name)?;
        let use_case_name = validate_path_segment("use_case_name", self.use_case_name)?;

        for market in &self.markets {
            market.validate()?;
        }

        if let Some(budget) = self.budget.filter(|b| !b.is_finite() || *b < 0.0) {
            return Err(PayloadError::InvalidBudget(budget));
        }

        Ok(RequestPayload {
            image_uris: self.image_uris,
            file_uris: self.file_uris,
            client_name,
            use_case_name,
            markets: self.markets,
            user_prompt: self.user_prompt.filter(|p| !p.trim().is_empty()),
            budget: self.budget,
        })
    }
}

fn validate_path_segment(field: &'static str, value: String) -> Result<String, PayloadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PayloadError::MissingField(field));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(PayloadError::InvalidPathSegment {
            field,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

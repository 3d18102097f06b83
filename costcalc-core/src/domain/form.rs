//! Estimate input form
//!
//! The inputs a user gives for an estimate: per use-case questionnaires, market
//! roll-out, budget and free-text instructions. [`FormSession`] holds the
//! state of one user session and is passed explicitly to every handler that
//! reads or changes it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::payload::{PayloadBuilder, PayloadError, RequestPayload};

/// Prompt used when the user neither typed one nor finished the questionnaire
pub const DEFAULT_PROMPT: &str =
    "Extract cloud resources and estimate consumption. Output JSON only.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudType {
    Databricks,
    #[serde(rename = "AWS", alias = "aws")]
    Aws,
    Azure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationType {
    #[default]
    OneTimeHistoricalLoad,
    OngoingIncremental,
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    #[default]
    Batch,
    Streaming,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationComplexity {
    /// Plain copy
    #[default]
    Low,
    /// Joins
    Medium,
    /// Aggregations and enrichment
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MlWorkload {
    Training,
    BatchInference,
    RealTimeInference,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    OnDemand,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingTool {
    #[default]
    PowerBi,
    Tableau,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingUserType {
    #[default]
    Viewer,
    Pro,
    Premium,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmCategory {
    #[default]
    GenerativeAi,
    EmbeddingVectorSearch,
    FineTuning,
    Rag,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataMigrationInputs {
    pub cloud_type: Vec<CloudType>,
    pub migration_type: MigrationType,
    pub pipeline_mode: PipelineMode,
    pub historical_data_gb: u64,
    pub daily_incremental_gb: u64,
    pub pipelines: u32,
    pub runs_per_day: u32,
    pub avg_runtime_hours: f64,
    pub source_systems: u32,
    pub destination_systems: u32,
    pub transformation_complexity: TransformationComplexity,
    pub concurrent_pipelines: u32,
    pub storage_retention_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineLearningInputs {
    pub cloud_type: Vec<CloudType>,
    pub workload_types: Vec<MlWorkload>,
    pub training_data_gb: u64,
    pub training_frequency: TrainingFrequency,
    pub avg_training_hours: f64,
    pub models_count: u32,
    pub inference_requests_per_day: u64,
    pub peak_concurrency: u32,
    pub use_gpu: bool,
    pub gpu_hours_per_day: u32,
    pub model_retention_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingInputs {
    pub cloud_type: Vec<CloudType>,
    pub tool: ReportingTool,
    pub user_type: ReportingUserType,
    pub number_of_users: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmInputs {
    pub cloud_type: Vec<CloudType>,
    pub llm_category: LlmCategory,
    pub llm_model: String,
    pub requests_per_day: u64,
}

impl Default for LlmInputs {
    fn default() -> Self {
        Self {
            cloud_type: Vec::new(),
            llm_category: LlmCategory::default(),
            llm_model: "GPT-4.1".to_string(),
            requests_per_day: 0,
        }
    }
}

/// Questionnaire answers for one use-case type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UseCaseInputs {
    DataMigration(DataMigrationInputs),
    MachineLearning(MachineLearningInputs),
    Reporting(ReportingInputs),
    Llm(LlmInputs),
}

impl fmt::Display for UseCaseInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UseCaseInputs::DataMigration(_) => "Data Migration",
            UseCaseInputs::MachineLearning(_) => "Machine Learning",
            UseCaseInputs::Reporting(_) => "Reporting",
            UseCaseInputs::Llm(_) => "LLM",
        };
        write!(f, "{}", name)
    }
}

/// State of one user session
///
/// Use-case stores are created with default answers the first time they are
/// accessed. Nothing here is global: callers own the session and hand it to
/// whatever needs it.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    data_migration: Option<DataMigrationInputs>,
    machine_learning: Option<MachineLearningInputs>,
    reporting: Option<ReportingInputs>,
    llm: Option<LlmInputs>,
    final_prompt: Option<String>,
    image_urls: Vec<String>,
    document_urls: Vec<String>,
    result_link: Option<String>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_migration_mut(&mut self) -> &mut DataMigrationInputs {
        self.data_migration.get_or_insert_with(Default::default)
    }

    pub fn machine_learning_mut(&mut self) -> &mut MachineLearningInputs {
        self.machine_learning.get_or_insert_with(Default::default)
    }

    pub fn reporting_mut(&mut self) -> &mut ReportingInputs {
        self.reporting.get_or_insert_with(Default::default)
    }

    pub fn llm_mut(&mut self) -> &mut LlmInputs {
        self.llm.get_or_insert_with(Default::default)
    }

    /// Stores questionnaire answers in the matching use-case store
    pub fn apply(&mut self, inputs: UseCaseInputs) {
        match inputs {
            UseCaseInputs::DataMigration(dm) => *self.data_migration_mut() = dm,
            UseCaseInputs::MachineLearning(ml) => *self.machine_learning_mut() = ml,
            UseCaseInputs::Reporting(rp) => *self.reporting_mut() = rp,
            UseCaseInputs::Llm(llm) => *self.llm_mut() = llm,
        }
    }

    /// Renders the questionnaire answers into the prompt and keeps it
    pub fn finish_input(&mut self) -> &str {
        let prompt = self.render_prompt();
        self.final_prompt.insert(prompt).as_str()
    }

    /// Prompt text with one section per use-case store
    pub fn render_prompt(&self) -> String {
        let sections = [
            ("DATA MIGRATION", section_json(&self.data_migration)),
            ("MACHINE LEARNING", section_json(&self.machine_learning)),
            ("REPORTING", section_json(&self.reporting)),
            ("LLM", section_json(&self.llm)),
        ];

        sections
            .iter()
            .map(|(title, body)| format!("{}:\n{}", title, body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// The prompt to send: the finished prompt, else the default one
    pub fn prompt(&self) -> &str {
        self.final_prompt.as_deref().unwrap_or(DEFAULT_PROMPT)
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.final_prompt = Some(prompt.into());
    }

    pub fn add_image_url(&mut self, url: impl Into<String>) {
        self.image_urls.push(url.into());
    }

    pub fn add_document_url(&mut self, url: impl Into<String>) {
        self.document_urls.push(url.into());
    }

    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    pub fn document_urls(&self) -> &[String] {
        &self.document_urls
    }

    pub fn set_result_link(&mut self, link: impl Into<String>) {
        self.result_link = Some(link.into());
    }

    pub fn result_link(&self) -> Option<&str> {
        self.result_link.as_deref()
    }
}

fn section_json<T: Serialize>(store: &Option<T>) -> String {
    store
        .as_ref()
        .and_then(|s| serde_json::to_string(s).ok())
        .unwrap_or_else(|| "{}".to_string())
}

/// A market row as entered in the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInput {
    pub multiplier: f64,
    pub start_month: u8,
}

/// An estimate request as written in a form file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateForm {
    pub client_name: String,
    pub use_case_name: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub markets: Vec<MarketInput>,
    #[serde(default)]
    pub use_case: Option<UseCaseInputs>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl EstimateForm {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Loads the form answers into the session and settles the prompt
    ///
    /// An explicit prompt wins; otherwise the questionnaire is rendered, as
    /// when the user finishes input without editing the prompt.
    pub fn fill_session(&self, session: &mut FormSession) {
        if let Some(inputs) = &self.use_case {
            session.apply(inputs.clone());
        }

        match self.prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(prompt) => session.set_prompt(prompt),
            None if self.use_case.is_some() => {
                session.finish_input();
            }
            None => {}
        }
    }

    /// Checks everything the payload is built from except the uploads
    ///
    /// Lets callers reject a bad form before uploading anything for it.
    pub fn validate(&self) -> Result<(), PayloadError> {
        self.payload(&FormSession::new()).map(|_| ())
    }

    /// Builds the job payload from the form and the session's uploads
    pub fn payload(&self, session: &FormSession) -> Result<RequestPayload, PayloadError> {
        let mut builder = PayloadBuilder::new(&self.client_name, &self.use_case_name)
            .image_uris(session.image_urls().iter().cloned())
            .file_uris(session.document_urls().iter().cloned())
            .user_prompt(session.prompt());

        for market in &self.markets {
            builder = builder.market(market.multiplier, market.start_month);
        }

        if let Some(budget) = self.budget {
            builder = builder.budget(budget);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stores_default_on_first_access() {
        let mut session = FormSession::new();
        assert_eq!(session.reporting_mut().number_of_users, 0);

        session.reporting_mut().number_of_users = 40;
        assert_eq!(session.reporting_mut().number_of_users, 40);
        assert_eq!(session.llm_mut().llm_model, "GPT-4.1");
    }

    #[test]
    fn test_prompt_defaults() {
        let session = FormSession::new();
        assert_eq!(session.prompt(), DEFAULT_PROMPT);
    }

    #[test]
    fn test_render_prompt_sections() {
        let mut session = FormSession::new();
        session.data_migration_mut().pipelines = 12;

        let prompt = session.finish_input().to_string();
        assert!(prompt.starts_with("DATA MIGRATION:\n{"));
        assert!(prompt.contains("\"pipelines\":12"));
        assert!(prompt.contains("MACHINE LEARNING:\n{}"));
        assert!(prompt.contains("REPORTING:\n{}"));
        assert!(prompt.contains("LLM:\n{}"));
        assert_eq!(session.prompt(), prompt);
    }

    #[test]
    fn test_parse_form_file() {
        let form = EstimateForm::from_json(
            r#"{
                "client_name": "acme",
                "use_case_name": "q1",
                "budget": 250000,
                "markets": [{"multiplier": 1.0, "start_month": 1}, {"multiplier": 0.4, "start_month": 7}],
                "use_case": {"type": "reporting", "tool": "tableau", "number_of_users": 25, "cloud_type": ["AWS"]}
            }"#,
        )
        .unwrap();

        assert_eq!(form.markets.len(), 2);
        match form.use_case.as_ref().unwrap() {
            UseCaseInputs::Reporting(rp) => {
                assert_eq!(rp.tool, ReportingTool::Tableau);
                assert_eq!(rp.user_type, ReportingUserType::Viewer);
                assert_eq!(rp.number_of_users, 25);
                assert_eq!(rp.cloud_type, vec![CloudType::Aws]);
            }
            other => panic!("unexpected use case: {}", other),
        }
    }

    #[test]
    fn test_form_builds_payload_from_session() {
        let form = EstimateForm::from_json(
            r#"{
                "client_name": "acme",
                "use_case_name": "q1",
                "markets": [{"multiplier": 1.5, "start_month": 3}],
                "use_case": {"type": "llm", "requests_per_day": 1000}
            }"#,
        )
        .unwrap();

        let mut session = FormSession::new();
        form.fill_session(&mut session);
        session.add_image_url("https://acct.blob.core.windows.net/c/uploads/images/a.png");
        session.add_document_url("https://acct.blob.core.windows.net/c/uploads/pdfs/b.pdf");

        let payload = form.payload(&session).unwrap();
        assert_eq!(payload.image_uris().len(), 1);
        assert_eq!(payload.file_uris().len(), 1);
        assert_eq!(payload.markets()[0].market, "M1");
        assert!(payload.user_prompt().unwrap().contains("\"requests_per_day\":1000"));
    }

    #[test]
    fn test_explicit_prompt_wins() {
        let form = EstimateForm::from_json(
            r#"{
                "client_name": "acme",
                "use_case_name": "q1",
                "prompt": "Assume enterprise-grade HA architecture",
                "use_case": {"type": "machine_learning", "use_gpu": true}
            }"#,
        )
        .unwrap();

        let mut session = FormSession::new();
        form.fill_session(&mut session);
        assert!(session.machine_learning_mut().use_gpu);

        let payload = form.payload(&session).unwrap();
        assert_eq!(
            payload.user_prompt(),
            Some("Assume enterprise-grade HA architecture")
        );
    }

    #[test]
    fn test_form_without_use_case_uses_default_prompt() {
        let form = EstimateForm::from_json(r#"{"client_name": "acme", "use_case_name": "q1"}"#)
            .unwrap();
        let mut session = FormSession::new();
        form.fill_session(&mut session);

        let payload = form.payload(&session).unwrap();
        assert_eq!(payload.user_prompt(), Some(DEFAULT_PROMPT));
    }

    #[test]
    fn test_form_requires_names() {
        let form = EstimateForm::from_json(r#"{"client_name": "", "use_case_name": "q1"}"#).unwrap();
        assert_eq!(
            form.payload(&FormSession::new()),
            Err(PayloadError::MissingField("client_name"))
        );
    }

    #[test]
    fn test_validate_checks_names_and_markets() {
        let form = EstimateForm::from_json(
            r#"{"client_name": "acme", "use_case_name": "q1", "markets": [{"multiplier": 1.0, "start_month": 3}]}"#,
        )
        .unwrap();
        assert_eq!(form.validate(), Ok(()));

        let form = EstimateForm::from_json(r#"{"client_name": "..", "use_case_name": "q1"}"#).unwrap();
        assert!(matches!(
            form.validate(),
            Err(PayloadError::InvalidPathSegment { field: "client_name", .. })
        ));

        let form = EstimateForm::from_json(
            r#"{"client_name": "acme", "use_case_name": "q1", "markets": [{"multiplier": 1.0, "start_month": 13}]}"#,
        )
        .unwrap();
        assert!(matches!(
            form.validate(),
            Err(PayloadError::InvalidStartMonth { .. })
        ));
    }
}

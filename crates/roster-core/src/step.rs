//! Import step state and operations.

use serde::Serialize;
use tracing::{debug, info, warn};

use roster_analysis::{
    AnalysisBackend, AnalysisError, AnalysisRequest, AnalysisTrigger, fallback_assessment,
};
use roster_ingest::{IngestError, IngestLimits, UploadFile, ingest_upload, sha256_hex, template_csv};
use roster_map::{MappingEngine, apply_mapping};
use roster_model::{
    ColumnMapping, FieldSchema, MappingSuggestion, ValidationIssue, ValidationSummary,
    ValidationWarning,
};
use roster_report::{PREVIEW_LIMIT, Preview};
use roster_validate::{RuleSet, validate};

use crate::error::StepError;
use crate::session::UploadSession;

/// What the analysis panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisPanel {
    #[default]
    Idle,
    Completed { analysis: String },
    /// The call failed; `fallback` is a locally computed assessment.
    Failed { message: String, fallback: String },
}

/// Result of running an [`AnalysisJob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Completed(String),
    Failed {
        error: AnalysisError,
        fallback: String,
    },
}

/// A detached analysis request for the current session.
///
/// Owns everything it needs, so it can run on another thread while the step
/// keeps accepting edits. Hand the outcome back through
/// [`ImportStep::record_analysis`].
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub request: AnalysisRequest,
    fingerprint: String,
    upload_id: u64,
    trigger: AnalysisTrigger,
}

impl AnalysisJob {
    pub fn run<B>(&self, backend: &B) -> AnalysisOutcome
    where
        B: AnalysisBackend + ?Sized,
    {
        match self.trigger.run(backend, &self.request) {
            Ok(analysis) => AnalysisOutcome::Completed(analysis),
            Err(error) => AnalysisOutcome::Failed {
                error,
                fallback: fallback_assessment(&self.request),
            },
        }
    }

    /// Fingerprint of the session the request was built from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// One canonical field with its selectable columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRow {
    pub field: String,
    pub label: String,
    pub required: bool,
    pub column: Option<String>,
    /// Headers of the upload; "unset" is always available as well.
    pub options: Vec<String>,
}

/// Snapshot of everything the step displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    /// The upload control stays available in every state.
    pub upload_visible: bool,
    pub file_name: Option<String>,
    pub mapping: Vec<MappingRow>,
    pub preview: Option<Preview>,
    pub summary: Option<ValidationSummary>,
    pub issues: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationWarning>,
    pub analysis: AnalysisPanel,
    pub analysis_pending: bool,
}

/// Serializable outcome of an import, for machine-readable output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub file_name: String,
    pub fingerprint: String,
    pub headers: Vec<String>,
    pub mapping: ColumnMapping,
    pub suggestions: Vec<MappingSuggestion>,
    pub summary: ValidationSummary,
    pub issues: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationWarning>,
    pub preview: Option<Preview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_indicator: Option<String>,
    pub analysis: AnalysisPanel,
}

/// The participant upload step.
#[derive(Debug)]
pub struct ImportStep {
    schema: FieldSchema,
    rules: RuleSet,
    engine: MappingEngine,
    limits: IngestLimits,
    session: Option<UploadSession>,
    analysis: AnalysisPanel,
    trigger: AnalysisTrigger,
    /// Bumped on every accepted upload and on `clear`.
    upload_id: u64,
}

impl ImportStep {
    /// Create the step for `schema`; fails if a field pattern does not compile.
    pub fn new(schema: FieldSchema, limits: IngestLimits) -> roster_validate::Result<Self> {
        let rules = RuleSet::from_schema(&schema)?;
        Ok(Self {
            engine: MappingEngine::new(schema.clone()),
            schema,
            rules,
            limits,
            session: None,
            analysis: AnalysisPanel::Idle,
            trigger: AnalysisTrigger::new(),
            upload_id: 0,
        })
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn session(&self) -> Option<&UploadSession> {
        self.session.as_ref()
    }

    pub fn analysis(&self) -> &AnalysisPanel {
        &self.analysis
    }

    /// Accept a new file.
    ///
    /// On rejection nothing changes. On success the previous session is
    /// replaced, the columns are auto-mapped and the records validated.
    pub fn upload(&mut self, file: &UploadFile) -> Result<&UploadSession, IngestError> {
        let table = ingest_upload(file, &self.limits).inspect_err(|error| {
            warn!(file = %file.file_name, %error, "upload rejected");
        })?;

        let proposal = self.engine.suggest(&table.headers);
        info!(
            file = %file.file_name,
            mapped = proposal.mapping.mapped_count(),
            fields = self.schema.len(),
            unmapped_columns = proposal.unmapped_columns.len(),
            "auto-mapped columns"
        );
        let mut session = UploadSession {
            file_name: file.file_name.clone(),
            fingerprint: sha256_hex(&file.bytes),
            headers: table.headers,
            rows: table.rows,
            mapping: proposal.mapping,
            suggestions: proposal.suggestions,
            participants: Vec::new(),
            report: Default::default(),
        };
        derive_records(&self.rules, &mut session);

        self.analysis = AnalysisPanel::Idle;
        self.upload_id += 1;
        Ok(self.session.insert(session))
    }

    /// Point `field` at `column`, or unset it with `None`, then re-derive the
    /// records and validation. Returns the previously assigned column.
    pub fn assign_mapping(
        &mut self,
        field: &str,
        column: Option<&str>,
    ) -> Result<Option<String>, StepError> {
        let session = self.session.as_mut().ok_or(StepError::NoSession)?;
        let previous = session.mapping.assign(field, column, &session.headers)?;
        debug!(field, column = column.unwrap_or("-"), "mapping changed");
        derive_records(&self.rules, session);
        Ok(previous)
    }

    /// Drop the current session.
    pub fn clear(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(file = %session.file_name, "cleared upload");
        }
        self.analysis = AnalysisPanel::Idle;
        self.upload_id += 1;
    }

    pub fn view(&self) -> StepView {
        let mapping = self
            .schema
            .fields()
            .iter()
            .map(|field| MappingRow {
                field: field.id.clone(),
                label: field.label.clone(),
                required: field.required,
                column: self
                    .session
                    .as_ref()
                    .and_then(|session| session.mapping.get(&field.id))
                    .map(str::to_string),
                options: self
                    .session
                    .as_ref()
                    .map(|session| session.headers.clone())
                    .unwrap_or_default(),
            })
            .collect();

        let session = self.session.as_ref();
        StepView {
            upload_visible: true,
            file_name: session.map(|session| session.file_name.clone()),
            mapping,
            preview: session
                .and_then(|session| Preview::build(&session.participants, PREVIEW_LIMIT)),
            summary: session.map(|session| session.report.summary),
            issues: session
                .map(|session| session.report.issues.clone())
                .unwrap_or_default(),
            warnings: session
                .map(|session| session.report.warnings.clone())
                .unwrap_or_default(),
            analysis: self.analysis.clone(),
            analysis_pending: self.trigger.is_pending(),
        }
    }

    /// Machine-readable report of the current session.
    pub fn report(&self) -> Option<ImportReport> {
        let session = self.session.as_ref()?;
        let preview = Preview::build(&session.participants, PREVIEW_LIMIT);
        Some(ImportReport {
            file_name: session.file_name.clone(),
            fingerprint: session.fingerprint.clone(),
            headers: session.headers.clone(),
            mapping: session.mapping.clone(),
            suggestions: session.suggestions.clone(),
            summary: session.report.summary,
            issues: session.report.issues.clone(),
            warnings: session.report.warnings.clone(),
            preview_indicator: preview.as_ref().and_then(Preview::indicator),
            preview,
            analysis: self.analysis.clone(),
        })
    }

    /// Build an analysis job for the current session.
    ///
    /// `None` without a session or when it has no records.
    pub fn prepare_analysis(&self) -> Option<AnalysisJob> {
        let session = self.session.as_ref().filter(|session| !session.is_empty())?;
        Some(AnalysisJob {
            request: AnalysisRequest::new(
                &self.schema,
                &session.headers,
                &session.rows,
                &session.mapping,
            ),
            fingerprint: session.fingerprint.clone(),
            upload_id: self.upload_id,
            trigger: self.trigger.clone(),
        })
    }

    /// Show the outcome of `job` in the analysis panel.
    ///
    /// Returns false, leaving the panel alone, when the outcome was refused
    /// because another request was pending or when the session has changed
    /// since the job was prepared. The session itself is never touched.
    pub fn record_analysis(&mut self, job: &AnalysisJob, outcome: AnalysisOutcome) -> bool {
        let current = self.session.as_ref().map(|session| session.fingerprint.as_str());
        if job.upload_id != self.upload_id || current != Some(job.fingerprint()) {
            debug!("discarding analysis for a replaced upload");
            return false;
        }
        self.analysis = match outcome {
            AnalysisOutcome::Completed(analysis) => AnalysisPanel::Completed { analysis },
            AnalysisOutcome::Failed {
                error: AnalysisError::InFlight,
                ..
            } => return false,
            AnalysisOutcome::Failed { error, fallback } => AnalysisPanel::Failed {
                message: error.user_message().to_string(),
                fallback,
            },
        };
        true
    }

    /// Header-only CSV template for the active schema.
    pub fn template(&self) -> Result<String, IngestError> {
        template_csv(&self.schema)
    }
}

fn derive_records(rules: &RuleSet, session: &mut UploadSession) {
    session.participants = apply_mapping(&session.mapping, &session.rows);
    session.report = validate(
        rules,
        &session.mapping,
        &session.headers,
        &session.participants,
    );
}

/// State of one upload attempt: the loaded document, its local diagnostics
/// and the outcome of the last submission.
use super::submitter::ImportSubmitter;
use crate::modules::data_import::domain::{
    BatchDocument, BatchInputError, BatchValidator, Diagnostic, ImportOutcome, ValidatedBatch,
};
use crate::shared::application::{ImportEvent, ImportEventSink};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use std::path::Path;
use std::sync::Arc;

pub struct ImportSession {
    submitter: Arc<ImportSubmitter>,
    events: Arc<dyn ImportEventSink>,
    document: Option<BatchDocument>,
    structural_error: Option<BatchInputError>,
    local_diagnostics: Vec<Diagnostic>,
    validated: Option<ValidatedBatch>,
    uploading: bool,
    last_outcome: Option<ImportOutcome>,
}

impl ImportSession {
    pub fn new(submitter: Arc<ImportSubmitter>, events: Arc<dyn ImportEventSink>) -> Self {
        Self {
            submitter,
            events,
            document: None,
            structural_error: None,
            local_diagnostics: Vec::new(),
            validated: None,
            uploading: false,
            last_outcome: None,
        }
    }

    /// Forget the document, every diagnostic and the last outcome
    pub fn reset(&mut self) {
        self.document = None;
        self.structural_error = None;
        self.local_diagnostics.clear();
        self.validated = None;
        self.uploading = false;
        self.last_outcome = None;
    }

    /// Parses and validates a document given as text.
    ///
    /// Returns the number of local diagnostics; structural problems are
    /// returned as errors and also kept for display.
    pub fn load_document(&mut self, name: &str, text: &str) -> Result<usize, BatchInputError> {
        self.reset();
        let parsed = BatchDocument::parse(name, text);
        self.accept(parsed)
    }

    pub async fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, BatchInputError> {
        self.reset();
        let parsed = BatchDocument::load(path).await;
        self.accept(parsed)
    }

    fn accept(
        &mut self,
        parsed: Result<BatchDocument, BatchInputError>,
    ) -> Result<usize, BatchInputError> {
        let document = match parsed {
            Ok(document) => document,
            Err(e) => {
                self.structural_error = Some(e.clone());
                return Err(e);
            }
        };

        let report = BatchValidator::validate_records(document.records());
        let count = report.diagnostics().len();
        LogContext::validation_summary(document.name(), report.record_count(), count);
        self.events.emit(ImportEvent::BatchValidated {
            records: report.record_count(),
            diagnostics: count,
        });

        match report.into_validated() {
            Ok(batch) => self.validated = Some(batch),
            Err(diagnostics) => self.local_diagnostics = diagnostics,
        }
        self.document = Some(document);
        Ok(count)
    }

    pub fn document(&self) -> Option<&BatchDocument> {
        self.document.as_ref()
    }

    pub fn structural_error(&self) -> Option<&BatchInputError> {
        self.structural_error.as_ref()
    }

    pub fn local_diagnostics(&self) -> &[Diagnostic] {
        &self.local_diagnostics
    }

    pub fn validated_batch(&self) -> Option<&ValidatedBatch> {
        self.validated.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&ImportOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn can_upload(&self) -> bool {
        self.document.is_some()
            && self.structural_error.is_none()
            && self.local_diagnostics.is_empty()
            && self.validated.is_some()
            && !self.uploading
    }

    /// Server diagnostics take precedence once present; the two sets are never merged
    pub fn displayed_diagnostics(&self) -> &[Diagnostic] {
        match &self.last_outcome {
            Some(ImportOutcome::RejectedByValidation { items, .. }) => items,
            _ => &self.local_diagnostics,
        }
    }

    /// Submits the loaded batch. Refused without any network call while the
    /// session has structural errors or local diagnostics.
    pub async fn upload(&mut self) -> AppResult<&ImportOutcome> {
        if !self.can_upload() {
            self.events.emit(ImportEvent::SubmissionBlocked {
                diagnostics: self.local_diagnostics.len(),
            });
            return Err(self.blocked_reason());
        }
        let batch = match self.validated.as_ref() {
            Some(batch) => batch,
            None => return Err(self.blocked_reason()),
        };

        self.uploading = true;
        let outcome = self.submitter.submit(batch).await;
        self.uploading = false;

        let outcome: &ImportOutcome = self.last_outcome.insert(outcome);
        Ok(outcome)
    }

    fn blocked_reason(&self) -> AppError {
        if let Some(e) = &self.structural_error {
            return AppError::InvalidInput(e.to_string());
        }
        if self.document.is_none() {
            return AppError::InvalidInput("No document loaded".to_string());
        }
        AppError::ValidationError(format!(
            "{} local validation problems must be fixed before uploading",
            self.local_diagnostics.len()
        ))
    }
}

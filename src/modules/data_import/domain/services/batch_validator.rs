use super::record_validator::{CandidateRecord, RecordValidator};
use crate::modules::city::domain::CandidateCity;
use crate::modules::data_import::domain::batch_document::BatchInputError;
use crate::modules::data_import::domain::diagnostic::{group_by_index, Diagnostic, DiagnosticGroup};
use serde_json::Value;

/// Summary of validating a whole batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    diagnostics: Vec<Diagnostic>,
    valid: Vec<CandidateCity>,
    record_count: usize,
}

impl BatchReport {
    /// True iff no record produced a diagnostic
    pub fn ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn grouped(&self) -> Vec<DiagnosticGroup<'_>> {
        group_by_index(&self.diagnostics)
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// The typed batch, or the diagnostics that block it
    pub fn into_validated(self) -> Result<ValidatedBatch, Vec<Diagnostic>> {
        if self.ok() {
            Ok(ValidatedBatch {
                records: self.valid,
            })
        } else {
            Err(self.diagnostics)
        }
    }
}

/// A batch in which every record passed local validation.
///
/// Only `BatchValidator` builds one, so holding it proves the batch is clean.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBatch {
    records: Vec<CandidateCity>,
}

impl ValidatedBatch {
    pub fn records(&self) -> &[CandidateCity] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct BatchValidator;

impl BatchValidator {
    /// Validates a top-level JSON value that must be an array of records
    pub fn validate_batch(input: &Value) -> Result<BatchReport, BatchInputError> {
        match input {
            Value::Array(records) => Ok(Self::validate_records(records)),
            _ => Err(BatchInputError::NotAnArray),
        }
    }

    pub fn validate_records(records: &[Value]) -> BatchReport {
        let mut diagnostics = Vec::new();
        let mut valid = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            match RecordValidator::check(record, index) {
                CandidateRecord::Valid(city) => valid.push(city),
                CandidateRecord::Unvalidated {
                    diagnostics: found, ..
                } => diagnostics.extend(found),
            }
        }

        BatchReport {
            diagnostics,
            valid,
            record_count: records.len(),
        }
    }
}

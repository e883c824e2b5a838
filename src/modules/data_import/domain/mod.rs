pub mod batch_document;
pub mod diagnostic;
pub mod outcome;
pub mod services;

pub use batch_document::{BatchDocument, BatchInputError};
pub use diagnostic::{group_by_index, render_grouped, Diagnostic, DiagnosticGroup};
pub use outcome::ImportOutcome;
pub use services::{
    BatchReport, BatchValidator, CandidateRecord, RecordValidator, ValidatedBatch,
};

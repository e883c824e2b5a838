pub mod batch_validator;
pub mod record_validator;

pub use batch_validator::{BatchReport, BatchValidator, ValidatedBatch};
pub use record_validator::{CandidateRecord, RecordValidator};

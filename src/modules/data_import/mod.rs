/// Bulk import of city records
///
/// - Domain: batch documents, diagnostics, record and batch validation, outcomes
/// - Application: submission, upload session, advisory reference checks
/// - Infrastructure: multipart upload to the import endpoint
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    GatewayResponse, HistoryRefresh, ImportGateway, ImportSession, ImportSubmitter,
    ReferenceCheckService,
};
pub use domain::{
    render_grouped, BatchDocument, BatchInputError, BatchReport, BatchValidator, Diagnostic,
    ImportOutcome, RecordValidator, ValidatedBatch,
};
pub use infrastructure::HttpImportGateway;

pub mod ports;
pub mod reference_check;
pub mod session;
pub mod submitter;

pub use ports::{GatewayResponse, HistoryRefresh, ImportGateway};
pub use reference_check::ReferenceCheckService;
pub use session::ImportSession;
pub use submitter::ImportSubmitter;

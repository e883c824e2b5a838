pub mod logger;
pub mod validation;

pub use logger::{init_logger, LogContext, TimedOperation};
pub use validation::ValueChecks;

// Shared kernel used by every bounded context

pub mod application; // Pagination and the event sink port
pub mod config; // Environment configuration
pub mod errors; // Shared error types
pub mod infrastructure; // HTTP plumbing
pub mod utils; // Logging and value checks

pub use config::AppConfig;
pub use errors::{AppError, AppResult};

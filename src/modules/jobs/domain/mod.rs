pub mod entities;
pub mod notifications;
pub mod repository;

pub use entities::{detect_transitions, ImportOperation, ImportStatus, JobTransition};
pub use notifications::{ChangeNotifier, SignalHandler, Subscription, IMPORTS_TOPIC};
pub use repository::ImportHistorySource;

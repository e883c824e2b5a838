pub mod event_sink;
pub mod pagination;

pub use event_sink::{ImportEvent, ImportEventSink, LogEventSink, RecordingEventSink};
pub use pagination::*;

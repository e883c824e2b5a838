/// Shared infrastructure concerns
///
/// HTTP plumbing used by the adapters of every bounded context.
pub mod http_client;

pub use http_client::{CommonHttpHandler, USER_AGENT};

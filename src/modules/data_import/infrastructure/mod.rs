pub mod http_gateway;
pub mod payload;

pub use http_gateway::HttpImportGateway;

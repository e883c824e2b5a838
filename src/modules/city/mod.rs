/// City bounded context
///
/// Typed city records, their enumerations and the read-only lookups of
/// referenced coordinates and governors.
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::ReferenceLookup;
pub use domain::{CandidateCity, Climate, CoordinatesSource, Government, GovernorSource};
pub use infrastructure::HttpReferenceLookup;

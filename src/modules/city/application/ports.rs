use crate::modules::city::domain::{CoordinatesDetails, GovernorDetails};
use async_trait::async_trait;

/// Read-only existence checks for referenced entities.
///
/// Any failure is reported as `None`: a lookup is advisory only.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn find_coordinates(&self, id: i64) -> Option<CoordinatesDetails>;

    async fn find_governor(&self, id: i64) -> Option<GovernorDetails>;
}

use crate::modules::city::application::ports::ReferenceLookup;
use crate::modules::data_import::domain::{Diagnostic, ValidatedBatch};
use futures::future::join_all;
use std::sync::Arc;

/// User-initiated "does this id exist" confirmation for a clean batch.
///
/// Results are advisory: they never block a submission, the server stays
/// the authority on referential integrity.
pub struct ReferenceCheckService {
    lookup: Arc<dyn ReferenceLookup>,
}

impl ReferenceCheckService {
    pub fn new(lookup: Arc<dyn ReferenceLookup>) -> Self {
        Self { lookup }
    }

    pub async fn check_batch(&self, batch: &ValidatedBatch) -> Vec<Diagnostic> {
        let checks = batch
            .records()
            .iter()
            .enumerate()
            .map(|(index, city)| async move {
                let mut found = Vec::new();
                if let Some(id) = city.coordinates_id() {
                    if self.lookup.find_coordinates(id).await.is_none() {
                        found.push(Diagnostic::new(
                            index,
                            "coordinatesId",
                            format!("coordinates {} not found", id),
                        ));
                    }
                }
                if let Some(id) = city.governor_id() {
                    if self.lookup.find_governor(id).await.is_none() {
                        found.push(Diagnostic::new(
                            index,
                            "governorId",
                            format!("governor {} not found", id),
                        ));
                    }
                }
                found
            });

        join_all(checks).await.into_iter().flatten().collect()
    }
}

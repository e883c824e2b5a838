/// Result of handing a validated batch to the import service
use super::diagnostic::Diagnostic;
use crate::shared::infrastructure::CommonHttpHandler;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const VALIDATION_FAILED: &str = "validation_failed";
const DEFAULT_REJECTION_MESSAGE: &str = "Import rejected due to validation errors";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// The service took the batch. Counts are only known when it reports them;
    /// completion is always observed through the import history.
    Accepted {
        created_count: Option<u32>,
        created_ids: Vec<i64>,
    },
    RejectedByValidation {
        message: String,
        items: Vec<Diagnostic>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceptedBody {
    created: Option<u32>,
    #[serde(default)]
    city_ids: Vec<i64>,
}

impl ImportOutcome {
    /// Interprets a raw HTTP answer of the import endpoint
    pub fn from_response(status: u16, body: &str) -> Self {
        if (200..300).contains(&status) {
            let accepted: AcceptedBody = serde_json::from_str(body).unwrap_or_default();
            return ImportOutcome::Accepted {
                created_count: accepted.created,
                created_ids: accepted.city_ids,
            };
        }

        if let Some(rejection) = Self::parse_rejection(body) {
            return rejection;
        }

        ImportOutcome::Failed {
            message: CommonHttpHandler::extract_api_message(body)
                .unwrap_or_else(|| format!("HTTP {}", status)),
        }
    }

    fn parse_rejection(body: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(body).ok()?;
        if value.get("error").and_then(Value::as_str) != Some(VALIDATION_FAILED) {
            return None;
        }
        let items = value.get("details")?.get("items")?.clone();
        let items: Vec<Diagnostic> = serde_json::from_value(items).ok()?;
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_REJECTION_MESSAGE)
            .to_string();
        Some(ImportOutcome::RejectedByValidation { message, items })
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ImportOutcome::Accepted { .. })
    }

    /// Server diagnostics, empty unless the batch was rejected
    pub fn remote_diagnostics(&self) -> &[Diagnostic] {
        match self {
            ImportOutcome::RejectedByValidation { items, .. } => items,
            _ => &[],
        }
    }
}

impl std::fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportOutcome::Accepted {
                created_count: Some(count),
                ..
            } => write!(f, "Import accepted: {} cities created", count),
            ImportOutcome::Accepted { .. } => write!(f, "Import accepted for processing"),
            ImportOutcome::RejectedByValidation { message, items } => {
                write!(f, "{} ({} problems)", message, items.len())
            }
            ImportOutcome::Failed { message } => write!(f, "Import failed: {}", message),
        }
    }
}

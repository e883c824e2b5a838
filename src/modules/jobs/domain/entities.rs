/// Import operations as reported by the import service
///
/// The service owns these records; this crate only reads and displays them.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Import status as sent by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    Pending,
    #[serde(alias = "IN_PROGRESS")]
    Running,
    Success,
    Failed,
}

impl ImportStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Success | ImportStatus::Failed)
    }

    /// Allowed lifecycle moves; terminal statuses never change
    pub fn can_transition_to(&self, next: ImportStatus) -> bool {
        match self {
            ImportStatus::Pending => next != ImportStatus::Pending,
            ImportStatus::Running => next.is_terminal(),
            ImportStatus::Success | ImportStatus::Failed => false,
        }
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportStatus::Pending => write!(f, "PENDING"),
            ImportStatus::Running => write!(f, "RUNNING"),
            ImportStatus::Success => write!(f, "SUCCESS"),
            ImportStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl std::str::FromStr for ImportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(ImportStatus::Pending),
            "RUNNING" | "IN_PROGRESS" => Ok(ImportStatus::Running),
            "SUCCESS" => Ok(ImportStatus::Success),
            "FAILED" => Ok(ImportStatus::Failed),
            _ => Err(format!("Invalid import status: {}", s)),
        }
    }
}

/// One row of the import history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOperation {
    pub id: i64,
    pub status: ImportStatus,
    #[serde(default)]
    pub added_count: Option<u32>,
    pub started_at: NaiveDateTime,
    #[serde(default)]
    pub finished_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ImportOperation {
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Status change of an operation seen between two fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTransition {
    pub id: i64,
    pub from: ImportStatus,
    pub to: ImportStatus,
}

impl JobTransition {
    /// A non-terminal operation reached a terminal status
    pub fn is_completion(&self) -> bool {
        !self.from.is_terminal() && self.to.is_terminal()
    }

    pub fn is_allowed(&self) -> bool {
        self.from.can_transition_to(self.to)
    }
}

/// Status changes of operations present in both snapshots
pub fn detect_transitions(
    previous: &[ImportOperation],
    current: &[ImportOperation],
) -> Vec<JobTransition> {
    current
        .iter()
        .filter_map(|now| {
            let before = previous.iter().find(|op| op.id == now.id)?;
            (before.status != now.status).then_some(JobTransition {
                id: now.id,
                from: before.status,
                to: now.status,
            })
        })
        .collect()
}

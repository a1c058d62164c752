use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Created,
    Modified,
    Analyzed,
    ConflictDetected,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Modified => write!(f, "modified"),
            Self::Analyzed => write!(f, "analyzed"),
            Self::ConflictDetected => write!(f, "conflict detected"),
        }
    }
}

/// One entry of the change-history timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub id: String,
    pub document: String,
    #[serde(rename = "type")]
    pub kind: ChangeType,
    pub description: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Change {
    /// Timestamp in local time when it parses, verbatim otherwise.
    pub fn display_time(&self) -> String {
        super::local_time(&self.timestamp, "%Y-%m-%d %H:%M:%S")
    }
}

//! Audit log entry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One immutable audit entry
///
/// - Create: `new_values` only
/// - Update: both snapshots plus `changed_fields` (may be empty - an update
///   with no observable change is still a recorded event)
/// - Delete: `old_values` only (state as it existed just before deletion)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: u64,
    pub entity_type: String,
    pub entity_id: u64,
    pub action: AuditAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_values: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_values: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Cross-entity audit query parameters
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub entity_type: Option<String>,
    pub entity_id: Option<u64>,
    pub action: Option<AuditAction>,
    pub user_id: Option<u64>,
    /// Inclusive lower bound on entry creation time
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on entry creation time
    pub to: Option<DateTime<Utc>>,
}

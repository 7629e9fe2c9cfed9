//! Change-history reconstruction
//!
//! Turns the raw audit trail back into typed revision lists: for each entry
//! the relevant snapshot is deserialized into a lenient view struct and the
//! acting user is resolved through the external directory. Reconstruction is
//! a read model only; nothing here writes.
//!
//! Leniency is the contract: audit rows outlive schema changes, so a
//! snapshot that no longer parses yields an empty view instead of failing
//! the whole page, and a user the directory no longer knows collapses to an
//! id-only summary.

pub mod service;
pub mod views;

pub use service::HistoryService;
pub use views::{DateBlockView, ReservationView, RoomView};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::audit::AuditAction;
use crate::models::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryType {
    Created,
    Updated,
    Deleted,
}

impl From<AuditAction> for HistoryType {
    fn from(action: AuditAction) -> Self {
        match action {
            AuditAction::Create => Self::Created,
            AuditAction::Update => Self::Updated,
            AuditAction::Delete => Self::Deleted,
        }
    }
}

/// One reconstructed audit entry: the entity as it looked at that moment
/// plus who changed it and what
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision<T> {
    pub entity: T,
    pub history_type: HistoryType,
    pub history_created_at: DateTime<Utc>,
    /// Field names touched by the change; empty for creations and deletions
    pub updated_fields: Vec<String>,
    pub updated_by: UserSummary,
}

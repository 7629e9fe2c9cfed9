//! Room group - pricing tier a room belongs to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pricing tier grouping a set of rooms
///
/// Groups are referenced, never owned, by rooms; a group cannot be deleted
/// while rooms still point at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomGroup {
    pub id: u64,
    /// Unique group name
    pub name: String,
    /// Nightly price during peak season
    pub peek_price: i64,
    /// Nightly price off season
    pub off_peek_price: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: u64,
    pub updated_by: u64,
}

//! Room - bookable unit of inventory

use crate::audit::Auditable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Room operational status
///
/// Only `Normal` rooms are offered by the availability resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Normal,
    Inactive,
    UnderConstruction,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::UnderConstruction => write!(f, "UNDER_CONSTRUCTION"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: u64,
    /// Unique, non-empty room number
    pub number: String,
    pub room_group_id: u64,
    pub note: String,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: u64,
    pub updated_by: u64,
}

impl Room {
    pub fn is_bookable(&self) -> bool {
        self.status == RoomStatus::Normal
    }
}

impl Auditable for Room {
    fn audit_entity_type(&self) -> &'static str {
        "room"
    }

    fn audit_entity_id(&self) -> u64 {
        self.id
    }

    fn audit_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("id".into(), json!(self.id));
        fields.insert("number".into(), json!(self.number));
        fields.insert("roomGroupId".into(), json!(self.room_group_id));
        fields.insert("note".into(), json!(self.note));
        fields.insert("status".into(), json!(self.status.to_string()));
        fields.insert("createdBy".into(), json!(self.created_by));
        fields.insert("updatedBy".into(), json!(self.updated_by));
        fields.insert("createdAt".into(), json!(self.created_at));
        fields.insert("updatedAt".into(), json!(self.updated_at));
        fields
    }
}

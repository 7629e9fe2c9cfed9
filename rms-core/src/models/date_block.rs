//! Date block - administrative blackout period

use crate::audit::Auditable;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Administrator-declared period during which no reservation stay may be
/// created or moved, regardless of room
///
/// Bounds are inclusive with day granularity; `start_date == end_date`
/// denotes a one-day block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBlock {
    pub id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: u64,
    pub updated_by: u64,
}

impl DateBlock {
    /// Whether this block intersects the half-open stay interval `[start, end)`
    pub fn intersects(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.end_date >= start && self.start_date < end
    }
}

impl Auditable for DateBlock {
    fn audit_entity_type(&self) -> &'static str {
        "date_block"
    }

    fn audit_entity_id(&self) -> u64 {
        self.id
    }

    fn audit_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("id".into(), json!(self.id));
        fields.insert("startDate".into(), json!(self.start_date.to_string()));
        fields.insert("endDate".into(), json!(self.end_date.to_string()));
        fields.insert("reason".into(), json!(self.reason));
        fields.insert("createdBy".into(), json!(self.created_by));
        fields.insert("updatedBy".into(), json!(self.updated_by));
        fields.insert("createdAt".into(), json!(self.created_at));
        fields.insert("updatedAt".into(), json!(self.updated_at));
        fields
    }
}

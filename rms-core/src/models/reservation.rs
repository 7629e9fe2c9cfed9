//! Reservation - date-bounded booking against one or more rooms

use crate::audit::Auditable;
use crate::models::datetime_value;
use crate::models::payment_method::PaymentMethod;
use crate::models::room::Room;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Refund,
    Cancel,
    Pending,
    Normal,
    CheckedOut,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Refund => write!(f, "REFUND"),
            Self::Cancel => write!(f, "CANCEL"),
            Self::Pending => write!(f, "PENDING"),
            Self::Normal => write!(f, "NORMAL"),
            Self::CheckedOut => write!(f, "CHECKED_OUT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationType {
    Stay,
    MonthlyRent,
}

impl std::fmt::Display for ReservationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stay => write!(f, "STAY"),
            Self::MonthlyRent => write!(f, "MONTHLY_RENT"),
        }
    }
}

/// Room assignment owned by a reservation
///
/// `room` is a resolved convenience reference; the foreign key `room_id`
/// is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRoom {
    pub room_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: u64,
    pub payment_method_id: u64,
    /// Resolved payment method; re-resolved whenever the foreign key is
    /// reassigned so the attached object always matches the key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Assigned rooms, exclusively owned by this reservation
    pub rooms: Vec<ReservationRoom>,
    pub name: String,
    pub phone: String,
    pub people_count: i32,
    /// Check-in date (inclusive)
    pub stay_start_at: NaiveDate,
    /// Check-out date (exclusive)
    pub stay_end_at: NaiveDate,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub price: i64,
    pub deposit: i64,
    pub payment_amount: i64,
    pub refund_amount: i64,
    /// Derived: floor(price * payment method commission rate)
    pub broker_fee: i64,
    pub note: String,
    /// Stamped when status transitions into Cancel or Refund
    pub canceled_at: Option<DateTime<Utc>>,
    pub status: ReservationStatus,
    #[serde(rename = "type")]
    pub reservation_type: ReservationType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: u64,
    pub updated_by: u64,
}

impl Reservation {
    /// Active reservations count toward room occupancy
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Normal | ReservationStatus::Pending
        )
    }

    pub fn is_canceled(&self) -> bool {
        matches!(
            self.status,
            ReservationStatus::Cancel | ReservationStatus::Refund
        )
    }

    pub fn stay_days(&self) -> i64 {
        (self.stay_end_at - self.stay_start_at).num_days()
    }

    /// Whether this reservation occupies `room_id` over `[start, end)`
    pub fn occupies(&self, room_id: u64, start: NaiveDate, end: NaiveDate) -> bool {
        self.is_active()
            && self.rooms.iter().any(|rr| rr.room_id == room_id)
            && !(self.stay_end_at <= start || self.stay_start_at >= end)
    }
}

impl Auditable for Reservation {
    fn audit_entity_type(&self) -> &'static str {
        "reservation"
    }

    fn audit_entity_id(&self) -> u64 {
        self.id
    }

    fn audit_fields(&self) -> Map<String, Value> {
        // Room summaries sorted by id so diffs are order-stable
        let mut rooms: Vec<Value> = self
            .rooms
            .iter()
            .map(|rr| {
                json!({
                    "id": rr.room_id,
                    "number": rr.room.as_ref().map(|r| r.number.clone()).unwrap_or_default(),
                })
            })
            .collect();
        rooms.sort_by_key(|r| r["id"].as_u64().unwrap_or(0));

        let payment_method = json!({
            "id": self.payment_method_id,
            "name": self
                .payment_method
                .as_ref()
                .map(|pm| pm.name.clone())
                .unwrap_or_default(),
        });

        let mut fields = Map::new();
        fields.insert("id".into(), json!(self.id));
        fields.insert("rooms".into(), Value::Array(rooms));
        fields.insert("paymentMethod".into(), payment_method);
        fields.insert("name".into(), json!(self.name));
        fields.insert("phone".into(), json!(self.phone));
        fields.insert("peopleCount".into(), json!(self.people_count));
        fields.insert("stayStartAt".into(), json!(self.stay_start_at.to_string()));
        fields.insert("stayEndAt".into(), json!(self.stay_end_at.to_string()));
        fields.insert("checkInAt".into(), datetime_value(self.check_in_at.as_ref()));
        fields.insert(
            "checkOutAt".into(),
            datetime_value(self.check_out_at.as_ref()),
        );
        fields.insert("price".into(), json!(self.price));
        fields.insert("deposit".into(), json!(self.deposit));
        fields.insert("paymentAmount".into(), json!(self.payment_amount));
        fields.insert("refundAmount".into(), json!(self.refund_amount));
        fields.insert("brokerFee".into(), json!(self.broker_fee));
        fields.insert("note".into(), json!(self.note));
        fields.insert(
            "canceledAt".into(),
            datetime_value(self.canceled_at.as_ref()),
        );
        fields.insert("status".into(), json!(self.status.to_string()));
        fields.insert("type".into(), json!(self.reservation_type.to_string()));
        fields.insert("createdBy".into(), json!(self.created_by));
        fields.insert("updatedBy".into(), json!(self.updated_by));
        fields.insert("createdAt".into(), json!(self.created_at));
        fields.insert("updatedAt".into(), json!(self.updated_at));
        fields
    }
}

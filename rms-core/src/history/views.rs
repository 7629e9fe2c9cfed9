//! Lenient snapshot views
//!
//! Deserialization targets for audit snapshots. Every field carries a
//! default so entries written before a field existed, or after one was
//! dropped, still parse; dates stay as the strings the snapshot recorded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomView {
    pub id: u64,
    pub number: String,
    pub room_group_id: u64,
    pub note: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomRefView {
    pub id: u64,
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethodRefView {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReservationView {
    pub id: u64,
    pub rooms: Vec<RoomRefView>,
    pub payment_method: Option<PaymentMethodRefView>,
    pub name: String,
    pub phone: String,
    pub people_count: i32,
    pub stay_start_at: String,
    pub stay_end_at: String,
    pub check_in_at: Option<String>,
    pub check_out_at: Option<String>,
    pub price: i64,
    pub deposit: i64,
    pub payment_amount: i64,
    pub refund_amount: i64,
    pub broker_fee: i64,
    pub note: String,
    pub canceled_at: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub reservation_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateBlockView {
    pub id: u64,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
}

//! Domain entities
//!
//! Current state is always kept in these plain mutable records; the audit
//! trail in [`crate::audit`] is a side-channel for history display only.
//! Entities that participate in the audit trail implement
//! [`crate::audit::Auditable`] next to their definition.

pub mod date_block;
pub mod payment_method;
pub mod reservation;
pub mod room;
pub mod room_group;
pub mod user;

pub use date_block::DateBlock;
pub use payment_method::{PaymentMethod, PaymentMethodStatus};
pub use reservation::{Reservation, ReservationRoom, ReservationStatus, ReservationType};
pub use room::{Room, RoomStatus};
pub use room_group::RoomGroup;
pub use user::UserSummary;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// RFC 3339 (seconds precision, Z suffix) or null, for audit snapshots
pub(crate) fn datetime_value(t: Option<&DateTime<Utc>>) -> Value {
    match t {
        Some(t) => Value::String(t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => Value::Null,
    }
}

//! Payment method - booking channel with its commission terms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for PaymentMethodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Inactive => write!(f, "INACTIVE"),
        }
    }
}

/// Booking/payment channel attached to reservations
///
/// At most one payment method carries `is_default_select = true` at any time;
/// the store resets all others before setting a new default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: u64,
    /// Unique channel name
    pub name: String,
    /// Commission fraction, e.g. 0.025 = 2.5%
    pub commission_rate: f64,
    /// Whether the UI must surface an unpaid-amount check for this channel
    pub require_unpaid_amount_check: bool,
    /// Pre-selected channel in booking forms
    pub is_default_select: bool,
    pub status: PaymentMethodStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentMethod {
    /// Only active methods may be attached to new or updated reservations
    pub fn is_active(&self) -> bool {
        self.status == PaymentMethodStatus::Active
    }
}

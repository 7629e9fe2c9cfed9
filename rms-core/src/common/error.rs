//! Unified Error Handling
//!
//! Every variant is an expected, recoverable outcome that the caller can act
//! on; nothing here is process-fatal. All validation runs before any write,
//! so a returned error implies no partial state was persisted. The one
//! exception is audit logging, which happens after the primary write and is
//! swallowed by the services on failure.

use crate::db::RepoError;
use serde::Serialize;

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    // ========== Date validation ==========
    #[error("Invalid date range: stay start must be before stay end")]
    InvalidDateRange,

    #[error("Requested date range intersects an administrative date block")]
    DateRangeBlocked,

    // ========== Availability ==========
    #[error("Room is not available for the requested period")]
    RoomNotAvailable,

    // ========== Lookup failures ==========
    #[error("Reservation not found")]
    ReservationNotFound,

    #[error("Room not found")]
    RoomNotFound,

    #[error("Room group not found")]
    RoomGroupNotFound,

    #[error("Payment method not found")]
    PaymentMethodNotFound,

    #[error("Date block not found")]
    DateBlockNotFound,

    // ========== State / uniqueness ==========
    #[error("Payment method is inactive")]
    PaymentMethodInactive,

    #[error("Payment method name already exists")]
    PaymentMethodNameExists,

    #[error("Payment method is referenced by reservations")]
    PaymentMethodInUse,

    #[error("Room number already exists")]
    RoomNumberExists,

    #[error("Room is referenced by active reservations")]
    RoomHasReservations,

    #[error("Room group name already exists")]
    RoomGroupNameExists,

    #[error("Room group is referenced by rooms")]
    RoomGroupInUse,

    #[error("Validation failed: {0}")]
    Validation(String),

    // ========== Persistence ==========
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ServiceError {
    /// Stable machine-readable code, suitable for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::DateRangeBlocked => "DATE_RANGE_BLOCKED",
            Self::RoomNotAvailable => "ROOM_NOT_AVAILABLE",
            Self::ReservationNotFound => "RESERVATION_NOT_FOUND",
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::RoomGroupNotFound => "ROOM_GROUP_NOT_FOUND",
            Self::PaymentMethodNotFound => "PAYMENT_METHOD_NOT_FOUND",
            Self::DateBlockNotFound => "DATE_BLOCK_NOT_FOUND",
            Self::PaymentMethodInactive => "PAYMENT_METHOD_INACTIVE",
            Self::PaymentMethodNameExists => "PAYMENT_METHOD_NAME_EXISTS",
            Self::PaymentMethodInUse => "PAYMENT_METHOD_IN_USE",
            Self::RoomNumberExists => "ROOM_NUMBER_EXISTS",
            Self::RoomHasReservations => "ROOM_HAS_RESERVATIONS",
            Self::RoomGroupNameExists => "ROOM_GROUP_NAME_EXISTS",
            Self::RoomGroupInUse => "ROOM_GROUP_IN_USE",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Repo(_) => "STORAGE_ERROR",
        }
    }
}

/// Application-level Result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error payload for API layers sitting on top of this crate
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ServiceError::InvalidDateRange.code(), "INVALID_DATE_RANGE");
        assert_eq!(ServiceError::DateRangeBlocked.code(), "DATE_RANGE_BLOCKED");
        assert_eq!(ServiceError::RoomNotAvailable.code(), "ROOM_NOT_AVAILABLE");
    }

    #[test]
    fn error_body_carries_code_and_message() {
        let body = ErrorBody::from(&ServiceError::RoomNotAvailable);
        assert_eq!(body.code, "ROOM_NOT_AVAILABLE");
        assert!(!body.message.is_empty());
    }
}

//! Audit trail
//!
//! # Architecture
//!
//! ```text
//! Mutating service call
//!   └─ AuditService::log_create / log_update / log_delete
//!        └─ AuditLogRepository::append (append-only store)
//!
//! History read path
//!   └─ history::HistoryService → AuditService::get_history → typed snapshot
//! ```
//!
//! Audit calls are made explicitly from every mutating code path rather than
//! through persistence hooks: soft deletes do not pass through the same
//! lifecycle as hard deletes, so implicit interception would silently skip
//! them. Entries are immutable once written and are never updated or deleted
//! by application logic.

pub mod context;
pub mod diff;
pub mod service;
pub mod types;

pub use context::UserContext;
pub use service::AuditService;
pub use types::{AuditAction, AuditLog, AuditLogFilter};

use serde_json::{Map, Value};

/// Implemented by every entity that participates in the audit trail
///
/// The field map doubles as the JSON snapshot stored on each entry and as
/// the input to changed-field diffing, so keys use the stable wire names
/// (camelCase) rather than the Rust field names.
pub trait Auditable {
    /// Stable entity type tag, e.g. "room", "reservation", "date_block"
    fn audit_entity_type(&self) -> &'static str;

    fn audit_entity_id(&self) -> u64;

    /// Full field-name → value capture of the current state
    fn audit_fields(&self) -> Map<String, Value>;
}

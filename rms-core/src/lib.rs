//! RMS Core - reservation and availability engine for a small lodging operator
//!
//! # Architecture overview
//!
//! The crate is the in-process core of a room management system. It decides
//! whether a room may be booked for a date range, drives the reservation
//! lifecycle (create, patch, cancel, delete), and records every mutation of
//! rooms, reservations and date blocks as an immutable audit entry from which
//! historical snapshots can be reconstructed.
//!
//! # Module structure
//!
//! ```text
//! rms-core/src/
//! ├── common/        # Error taxonomy, logging setup
//! ├── models/        # Domain entities (Room, Reservation, DateBlock, ...)
//! ├── db/            # Repository contracts + in-memory reference engine
//! ├── audit/         # Append-only change log: snapshots, field diffs
//! ├── history/       # Point-in-time reconstruction from audit entries
//! └── services/      # Lifecycle managers (reservation core + CRUD managers)
//! ```
//!
//! Persistence, HTTP transport and authentication are external collaborators:
//! the repository traits in [`db`] are the persistence contract, and mutating
//! operations consume the acting user as an [`audit::UserContext`].

pub mod audit;
pub mod common;
pub mod db;
pub mod history;
pub mod models;
pub mod services;

// Re-export common types
pub use audit::{AuditAction, AuditLog, AuditService, Auditable, UserContext};
pub use common::{ServiceError, ServiceResult};
pub use common::logger::{init_logger, init_logger_with_file};
pub use db::MemoryStore;
pub use history::HistoryService;
pub use services::{
    DateBlockService, PaymentMethodService, ReservationService, RoomGroupService, RoomService,
};

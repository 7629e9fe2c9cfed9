//! Lifecycle managers
//!
//! One service per aggregate. Services own validation order and the audit
//! calls; repositories own atomicity. Every mutating call takes the acting
//! [`UserContext`](crate::audit::UserContext) so the audit trail can name
//! who did it.
//!
//! Audit writes happen after the primary write and never fail the
//! operation: a full trail is worth less than a lost booking.

pub mod date_block;
pub mod payment_method;
pub mod reservation;
pub mod room;
pub mod room_group;

pub use date_block::{DateBlockInput, DateBlockService};
pub use payment_method::{PaymentMethodInput, PaymentMethodService};
pub use reservation::{CreateReservation, ReservationPatch, ReservationService};
pub use room::{RoomInput, RoomService};
pub use room_group::{RoomGroupInput, RoomGroupService};

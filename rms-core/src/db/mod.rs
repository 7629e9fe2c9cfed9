//! Persistence contracts
//!
//! The engine never talks to a database directly. Each entity has an async
//! repository trait here; embedders plug in their own storage and the crate
//! ships [`MemoryStore`] as the reference implementation used by the tests.
//!
//! Availability is a persistence-layer query on purpose: the service-level
//! "is available" read is check-then-write and not race-free, so
//! [`ReservationRepository::create`] and [`ReservationRepository::update`]
//! must re-verify room availability inside one atomic unit and fail with
//! [`RepoError::Conflict`] when a concurrent booking won the race.

pub mod memory;

pub use memory::MemoryStore;

use crate::audit::{AuditLog, AuditLogFilter};
use crate::models::{
    DateBlock, PaymentMethod, Reservation, ReservationStatus, ReservationType, Room, RoomGroup,
    RoomStatus, UserSummary,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique-constraint violation, e.g. a room number already in use
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Atomic re-validation failed, e.g. a concurrent booking took the room
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// ========== Filters ==========

#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub room_group_id: Option<u64>,
    pub status: Option<RoomStatus>,
    /// Substring match on the room number
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    /// Stays intersecting `[stay_start_at, stay_end_at]` when either is set
    pub stay_start_at: Option<NaiveDate>,
    pub stay_end_at: Option<NaiveDate>,
    /// Substring match on guest name or phone
    pub search: Option<String>,
    pub status: Option<ReservationStatus>,
    pub reservation_type: Option<ReservationType>,
}

// ========== Statistics ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatisticsPeriod {
    Daily,
    Monthly,
    Yearly,
}

/// Aggregated reservation figures for one period bucket.
///
/// Only active reservations (Normal, Pending) are counted; cancelled and
/// refunded bookings do not contribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPoint {
    /// "YYYY-MM-DD" for daily buckets, "YYYY-MM" for monthly, "YYYY" for
    /// yearly
    pub period: String,
    pub total_sales: i64,
    pub total_reservations: u64,
    pub total_guests: i64,
    pub average_stay_days: f64,
}

// ========== Repositories ==========

#[async_trait]
pub trait RoomGroupRepository: Send + Sync {
    async fn create(&self, group: RoomGroup) -> RepoResult<RoomGroup>;
    async fn update(&self, group: RoomGroup) -> RepoResult<RoomGroup>;
    /// Soft delete; the row stays invisible to normal queries but is retained
    async fn delete(&self, id: u64, actor: u64) -> RepoResult<()>;
    async fn find_by_id(&self, id: u64) -> RepoResult<Option<RoomGroup>>;
    async fn find_all(&self, page: usize, size: usize) -> RepoResult<(Vec<RoomGroup>, u64)>;
    async fn exists_by_name(&self, name: &str, exclude_id: Option<u64>) -> RepoResult<bool>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: Room) -> RepoResult<Room>;
    async fn update(&self, room: Room) -> RepoResult<Room>;
    async fn delete(&self, id: u64, actor: u64) -> RepoResult<()>;
    async fn find_by_id(&self, id: u64) -> RepoResult<Option<Room>>;
    async fn find_all(
        &self,
        filter: RoomFilter,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<Room>, u64)>;
    async fn exists_by_number(&self, number: &str, exclude_id: Option<u64>) -> RepoResult<bool>;
    async fn count_by_group(&self, room_group_id: u64) -> RepoResult<u64>;

    /// True iff no other active reservation's assignment for `room_id`
    /// overlaps `[start, end)`. `exclude_reservation` removes that
    /// reservation from consideration (editing its own dates).
    async fn is_room_available(
        &self,
        room_id: u64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<u64>,
    ) -> RepoResult<bool>;

    /// All Normal-status rooms free over `[start, end)`, ordered by group
    /// then number
    async fn find_available_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<u64>,
    ) -> RepoResult<Vec<Room>>;

    /// Whether any non-cancelled reservation still references the room
    async fn has_active_reservations(&self, room_id: u64) -> RepoResult<bool>;
}

#[async_trait]
pub trait PaymentMethodRepository: Send + Sync {
    async fn create(&self, method: PaymentMethod) -> RepoResult<PaymentMethod>;
    async fn update(&self, method: PaymentMethod) -> RepoResult<PaymentMethod>;
    async fn delete(&self, id: u64) -> RepoResult<()>;
    async fn find_by_id(&self, id: u64) -> RepoResult<Option<PaymentMethod>>;
    async fn find_all(&self, page: usize, size: usize) -> RepoResult<(Vec<PaymentMethod>, u64)>;
    async fn find_active(&self) -> RepoResult<Vec<PaymentMethod>>;
    async fn exists_by_name(&self, name: &str, exclude_id: Option<u64>) -> RepoResult<bool>;
    /// Atomically clear every other default flag and set it on `id`, so
    /// there is never a window with two defaults
    async fn make_default(&self, id: u64) -> RepoResult<()>;
    async fn referenced_by_reservations(&self, id: u64) -> RepoResult<bool>;
}

#[async_trait]
pub trait DateBlockRepository: Send + Sync {
    async fn create(&self, block: DateBlock) -> RepoResult<DateBlock>;
    async fn update(&self, block: DateBlock) -> RepoResult<DateBlock>;
    async fn delete(&self, id: u64, actor: u64) -> RepoResult<()>;
    async fn find_by_id(&self, id: u64) -> RepoResult<Option<DateBlock>>;
    async fn find_all(&self, page: usize, size: usize) -> RepoResult<(Vec<DateBlock>, u64)>;
    /// True iff `[start, end)` intersects any stored block (inclusive
    /// bounds, day granularity); independent of any room
    async fn is_date_range_blocked(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<bool>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persist a new reservation with its room assignments already attached.
    /// Availability of every assigned room is re-verified atomically with
    /// the insert; a lost race yields [`RepoError::Conflict`].
    async fn create(&self, reservation: Reservation) -> RepoResult<Reservation>;

    /// Persist a mutated reservation. When `rooms_changed` is set the new
    /// assignment set replaces the old one and availability is re-verified
    /// atomically, excluding the reservation itself.
    async fn update(&self, reservation: Reservation, rooms_changed: bool)
    -> RepoResult<Reservation>;

    async fn delete(&self, id: u64, actor: u64) -> RepoResult<()>;
    async fn find_by_id(&self, id: u64) -> RepoResult<Option<Reservation>>;
    /// Like `find_by_id` but with payment method and room objects resolved
    async fn find_by_id_with_details(&self, id: u64) -> RepoResult<Option<Reservation>>;
    /// Most recent reservation referencing the room, by stay end then id;
    /// cancelled bookings count too (the last guest may have cancelled)
    async fn find_last_for_room(&self, room_id: u64) -> RepoResult<Option<Reservation>>;
    async fn find_all(
        &self,
        filter: ReservationFilter,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<Reservation>, u64)>;
    async fn statistics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        period: StatisticsPeriod,
    ) -> RepoResult<Vec<StatPoint>>;
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append one immutable entry; there is no update or delete
    async fn append(&self, entry: AuditLog) -> RepoResult<AuditLog>;
    /// Entries for one entity, newest first
    async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: u64,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<AuditLog>, u64)>;
    /// Cross-entity query, newest first
    async fn find_filtered(
        &self,
        filter: AuditLogFilter,
        page: usize,
        size: usize,
    ) -> RepoResult<(Vec<AuditLog>, u64)>;
}

/// External user directory, consumed only by history reconstruction
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: u64) -> RepoResult<Option<UserSummary>>;
}

//! Reservation lifecycle
//!
//! The booking path runs a fixed validation sequence before anything is
//! written: date-range sanity, administrative date blocks, payment method
//! existence and state, then per-room availability. The repository repeats
//! the availability check atomically with the insert, so a race between two
//! bookings resolves to exactly one winner and the loser surfaces as
//! [`ServiceError::RoomNotAvailable`].

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::audit::{AuditService, Auditable, UserContext};
use crate::common::{ServiceError, ServiceResult};
use crate::db::{
    DateBlockRepository, PaymentMethodRepository, RepoError, ReservationFilter,
    ReservationRepository, RoomRepository, StatPoint, StatisticsPeriod,
};
use crate::models::{
    PaymentMethod, Reservation, ReservationRoom, ReservationStatus, ReservationType, Room,
};

/// Booking request
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub payment_method_id: u64,
    pub room_ids: Vec<u64>,
    pub name: String,
    pub phone: String,
    pub people_count: i32,
    pub stay_start_at: NaiveDate,
    pub stay_end_at: NaiveDate,
    pub price: i64,
    pub deposit: i64,
    pub payment_amount: i64,
    pub note: String,
    pub status: ReservationStatus,
    pub reservation_type: ReservationType,
}

/// Partial update; `None` leaves a field untouched.
///
/// Check-in and check-out stamps are doubly optional so a patch can clear
/// them: `Some(None)` resets the stamp, `None` keeps it.
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    pub payment_method_id: Option<u64>,
    pub room_ids: Option<Vec<u64>>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub people_count: Option<i32>,
    pub stay_start_at: Option<NaiveDate>,
    pub stay_end_at: Option<NaiveDate>,
    pub check_in_at: Option<Option<DateTime<Utc>>>,
    pub check_out_at: Option<Option<DateTime<Utc>>>,
    pub price: Option<i64>,
    pub deposit: Option<i64>,
    pub payment_amount: Option<i64>,
    pub refund_amount: Option<i64>,
    pub note: Option<String>,
    pub status: Option<ReservationStatus>,
    pub reservation_type: Option<ReservationType>,
}

#[derive(Clone)]
pub struct ReservationService {
    reservations: Arc<dyn ReservationRepository>,
    rooms: Arc<dyn RoomRepository>,
    payment_methods: Arc<dyn PaymentMethodRepository>,
    date_blocks: Arc<dyn DateBlockRepository>,
    audit: AuditService,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        rooms: Arc<dyn RoomRepository>,
        payment_methods: Arc<dyn PaymentMethodRepository>,
        date_blocks: Arc<dyn DateBlockRepository>,
        audit: AuditService,
    ) -> Self {
        Self {
            reservations,
            rooms,
            payment_methods,
            date_blocks,
            audit,
        }
    }

    /// Create a booking.
    ///
    /// Validation order is observable through the returned error and is
    /// part of the contract: dates, date blocks, payment method, rooms,
    /// availability.
    ///
    /// Room assignment is optional: a roomless stay skips the availability
    /// checks but is still subject to date blocks.
    pub async fn create(
        &self,
        actor: &UserContext,
        input: CreateReservation,
    ) -> ServiceResult<Reservation> {
        if input.stay_start_at >= input.stay_end_at {
            return Err(ServiceError::InvalidDateRange);
        }
        if self
            .date_blocks
            .is_date_range_blocked(input.stay_start_at, input.stay_end_at)
            .await?
        {
            return Err(ServiceError::DateRangeBlocked);
        }

        let payment_method = self.require_active_payment_method(input.payment_method_id).await?;

        let mut rooms = Vec::with_capacity(input.room_ids.len());
        for room_id in &input.room_ids {
            rooms.push(self.require_room(*room_id).await?);
        }
        for room in &rooms {
            if !self
                .rooms
                .is_room_available(room.id, input.stay_start_at, input.stay_end_at, None)
                .await?
            {
                return Err(ServiceError::RoomNotAvailable);
            }
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: 0,
            payment_method_id: payment_method.id,
            broker_fee: broker_fee(input.price, &payment_method),
            payment_method: Some(payment_method),
            rooms: rooms
                .into_iter()
                .map(|room| ReservationRoom {
                    room_id: room.id,
                    room: Some(room),
                })
                .collect(),
            name: input.name,
            phone: input.phone,
            people_count: input.people_count,
            stay_start_at: input.stay_start_at,
            stay_end_at: input.stay_end_at,
            check_in_at: None,
            check_out_at: None,
            price: input.price,
            deposit: input.deposit,
            payment_amount: input.payment_amount,
            refund_amount: 0,
            note: input.note,
            canceled_at: matches!(
                input.status,
                ReservationStatus::Cancel | ReservationStatus::Refund
            )
            .then_some(now),
            status: input.status,
            reservation_type: input.reservation_type,
            created_at: now,
            updated_at: now,
            created_by: actor.actor_id(),
            updated_by: actor.actor_id(),
        };

        let created = self
            .reservations
            .create(reservation)
            .await
            .map_err(map_conflict)?;

        self.record_create(actor, &created).await;
        Ok(created)
    }

    /// Apply a partial update.
    ///
    /// Date or room changes re-run the availability checks; a patch that
    /// touches neither skips them, so a blocked-out period does not prevent
    /// editing an existing booking's guest details.
    pub async fn update(
        &self,
        actor: &UserContext,
        id: u64,
        patch: ReservationPatch,
    ) -> ServiceResult<Reservation> {
        let existing = self
            .reservations
            .find_by_id_with_details(id)
            .await?
            .ok_or(ServiceError::ReservationNotFound)?;
        let old_fields = existing.audit_fields();
        let previous_status = existing.status;

        let mut updated = existing;
        updated.updated_by = actor.actor_id();

        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(phone) = patch.phone {
            updated.phone = phone;
        }
        if let Some(people_count) = patch.people_count {
            updated.people_count = people_count;
        }
        if let Some(price) = patch.price {
            updated.price = price;
        }
        if let Some(deposit) = patch.deposit {
            updated.deposit = deposit;
        }
        if let Some(payment_amount) = patch.payment_amount {
            updated.payment_amount = payment_amount;
        }
        if let Some(refund_amount) = patch.refund_amount {
            updated.refund_amount = refund_amount;
        }
        if let Some(note) = patch.note {
            updated.note = note;
        }
        if let Some(reservation_type) = patch.reservation_type {
            updated.reservation_type = reservation_type;
        }
        if let Some(check_in_at) = patch.check_in_at {
            updated.check_in_at = check_in_at;
        }
        if let Some(check_out_at) = patch.check_out_at {
            updated.check_out_at = check_out_at;
        }

        let dates_changed = patch.stay_start_at.is_some() || patch.stay_end_at.is_some();
        if let Some(start) = patch.stay_start_at {
            updated.stay_start_at = start;
        }
        if let Some(end) = patch.stay_end_at {
            updated.stay_end_at = end;
        }
        if dates_changed {
            if updated.stay_start_at >= updated.stay_end_at {
                return Err(ServiceError::InvalidDateRange);
            }
            if self
                .date_blocks
                .is_date_range_blocked(updated.stay_start_at, updated.stay_end_at)
                .await?
            {
                return Err(ServiceError::DateRangeBlocked);
            }
        }

        let payment_method_changed = patch
            .payment_method_id
            .is_some_and(|pm_id| pm_id != updated.payment_method_id);
        if payment_method_changed {
            // Re-resolve the association so the loaded method matches the
            // new id; a stale embedded object would poison the snapshot
            let method = self
                .require_active_payment_method(
                    patch.payment_method_id.unwrap_or(updated.payment_method_id),
                )
                .await?;
            updated.payment_method_id = method.id;
            updated.payment_method = Some(method);
        }
        if payment_method_changed || patch.price.is_some() {
            let method = match &updated.payment_method {
                Some(method) => method.clone(),
                None => {
                    self.require_active_payment_method(updated.payment_method_id)
                        .await?
                }
            };
            updated.broker_fee = broker_fee(updated.price, &method);
        }

        let rooms_changed = patch.room_ids.is_some() || dates_changed;
        // An empty list is a valid assignment set: it releases every room
        // while the stay itself stands
        if let Some(room_ids) = patch.room_ids {
            let mut rooms = Vec::with_capacity(room_ids.len());
            for room_id in room_ids {
                let room = self.require_room(room_id).await?;
                rooms.push(ReservationRoom {
                    room_id: room.id,
                    room: Some(room),
                });
            }
            updated.rooms = rooms;
        }
        if rooms_changed {
            for rr in &updated.rooms {
                if !self
                    .rooms
                    .is_room_available(
                        rr.room_id,
                        updated.stay_start_at,
                        updated.stay_end_at,
                        Some(updated.id),
                    )
                    .await?
                {
                    return Err(ServiceError::RoomNotAvailable);
                }
            }
        }

        if let Some(status) = patch.status {
            updated.status = status;
            match status {
                // Re-stamped even when the reservation was already
                // cancelled: the stamp records the latest transition
                ReservationStatus::Cancel | ReservationStatus::Refund => {
                    updated.canceled_at = Some(Utc::now());
                }
                _ => {
                    if matches!(
                        previous_status,
                        ReservationStatus::Cancel | ReservationStatus::Refund
                    ) {
                        updated.canceled_at = None;
                    }
                }
            }
        }

        let stored = self
            .reservations
            .update(updated, rooms_changed)
            .await
            .map_err(map_conflict)?;

        if let Err(err) = self.audit.log_update(actor, &stored, old_fields).await {
            tracing::error!(reservation_id = stored.id, error = %err, "audit write failed");
        }
        Ok(stored)
    }

    /// Soft-delete a reservation, recording its final state first
    pub async fn delete(&self, actor: &UserContext, id: u64) -> ServiceResult<()> {
        let existing = self
            .reservations
            .find_by_id_with_details(id)
            .await?
            .ok_or(ServiceError::ReservationNotFound)?;

        self.reservations.delete(id, actor.actor_id()).await?;

        if let Err(err) = self.audit.log_delete(actor, &existing).await {
            tracing::error!(reservation_id = id, error = %err, "audit write failed");
        }
        Ok(())
    }

    pub async fn get(&self, id: u64) -> ServiceResult<Reservation> {
        self.reservations
            .find_by_id_with_details(id)
            .await?
            .ok_or(ServiceError::ReservationNotFound)
    }

    pub async fn list(
        &self,
        filter: ReservationFilter,
        page: usize,
        size: usize,
    ) -> ServiceResult<(Vec<Reservation>, u64)> {
        Ok(self.reservations.find_all(filter, page, size).await?)
    }

    /// Normal-status rooms free over `[start, end)`; when editing an
    /// existing reservation pass its id so its own assignments do not count
    pub async fn get_available_rooms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude_reservation: Option<u64>,
    ) -> ServiceResult<Vec<Room>> {
        if start >= end {
            return Err(ServiceError::InvalidDateRange);
        }
        Ok(self
            .rooms
            .find_available_rooms(start, end, exclude_reservation)
            .await?)
    }

    /// The reservation that most recently held the room, by stay end date.
    /// Used by housekeeping views; cancelled stays count as well.
    pub async fn last_for_room(&self, room_id: u64) -> ServiceResult<Option<Reservation>> {
        self.require_room(room_id).await?;
        Ok(self.reservations.find_last_for_room(room_id).await?)
    }

    pub async fn statistics(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        period: StatisticsPeriod,
    ) -> ServiceResult<Vec<StatPoint>> {
        if start > end {
            return Err(ServiceError::InvalidDateRange);
        }
        Ok(self.reservations.statistics(start, end, period).await?)
    }

    async fn require_active_payment_method(&self, id: u64) -> ServiceResult<PaymentMethod> {
        let method = self
            .payment_methods
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::PaymentMethodNotFound)?;
        if !method.is_active() {
            return Err(ServiceError::PaymentMethodInactive);
        }
        Ok(method)
    }

    async fn require_room(&self, id: u64) -> ServiceResult<Room> {
        self.rooms
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::RoomNotFound)
    }

    async fn record_create(&self, actor: &UserContext, reservation: &Reservation) {
        if let Err(err) = self.audit.log_create(actor, reservation).await {
            tracing::error!(reservation_id = reservation.id, error = %err, "audit write failed");
        }
    }
}

/// Commission truncates toward zero, matching integer money semantics
fn broker_fee(price: i64, method: &PaymentMethod) -> i64 {
    (price as f64 * method.commission_rate) as i64
}

fn map_conflict(err: RepoError) -> ServiceError {
    match err {
        RepoError::Conflict(_) => ServiceError::RoomNotAvailable,
        other => ServiceError::Repo(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethodStatus;

    fn method(rate: f64) -> PaymentMethod {
        PaymentMethod {
            id: 1,
            name: "card".into(),
            commission_rate: rate,
            require_unpaid_amount_check: false,
            is_default_select: false,
            status: PaymentMethodStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn broker_fee_truncates() {
        assert_eq!(broker_fee(100_000, &method(0.035)), 3_500);
        // 99_999 * 0.035 = 3_499.965
        assert_eq!(broker_fee(99_999, &method(0.035)), 3_499);
        assert_eq!(broker_fee(100_000, &method(0.0)), 0);
    }

    #[test]
    fn conflict_maps_to_room_not_available() {
        assert!(matches!(
            map_conflict(RepoError::Conflict("room:7".into())),
            ServiceError::RoomNotAvailable
        ));
        assert!(matches!(
            map_conflict(RepoError::Database("boom".into())),
            ServiceError::Repo(RepoError::Database(_))
        ));
    }
}

//! Shared test harness: every service wired onto one in-memory store

// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rms_core::audit::{AuditService, UserContext};
use rms_core::db::MemoryStore;
use rms_core::history::HistoryService;
use rms_core::models::{PaymentMethod, PaymentMethodStatus, Room, RoomGroup, RoomStatus};
use rms_core::services::{
    CreateReservation, DateBlockService, PaymentMethodInput, PaymentMethodService,
    ReservationService, RoomGroupInput, RoomGroupService, RoomInput, RoomService,
};
use rms_core::models::{ReservationStatus, ReservationType};

pub struct Env {
    pub store: Arc<MemoryStore>,
    pub audit: AuditService,
    pub reservations: ReservationService,
    pub rooms: RoomService,
    pub room_groups: RoomGroupService,
    pub payment_methods: PaymentMethodService,
    pub date_blocks: DateBlockService,
    pub history: HistoryService,
    pub actor: UserContext,
}

impl Env {
    pub fn new() -> Self {
        let store = MemoryStore::shared();
        let audit = AuditService::new(store.clone());
        Self {
            reservations: ReservationService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
                audit.clone(),
            ),
            rooms: RoomService::new(store.clone(), store.clone(), audit.clone()),
            room_groups: RoomGroupService::new(store.clone(), store.clone()),
            payment_methods: PaymentMethodService::new(store.clone()),
            date_blocks: DateBlockService::new(store.clone(), audit.clone()),
            history: HistoryService::new(audit.clone(), store.clone()),
            actor: UserContext::new(42, "front-desk"),
            audit,
            store,
        }
    }

    /// One group, one Normal room in it, one active zero-commission method
    pub async fn seed(&self) -> (RoomGroup, Room, PaymentMethod) {
        let group = self
            .room_groups
            .create(
                &self.actor,
                RoomGroupInput {
                    name: "standard".into(),
                    peek_price: 120_000,
                    off_peek_price: 90_000,
                    description: String::new(),
                },
            )
            .await
            .unwrap();
        let room = self.seed_room(&group, "101").await;
        let method = self.seed_method("cash", 0.0).await;
        (group, room, method)
    }

    pub async fn seed_room(&self, group: &RoomGroup, number: &str) -> Room {
        self.rooms
            .create(
                &self.actor,
                RoomInput {
                    number: number.into(),
                    room_group_id: group.id,
                    note: String::new(),
                    status: RoomStatus::Normal,
                },
            )
            .await
            .unwrap()
    }

    pub async fn seed_method(&self, name: &str, rate: f64) -> PaymentMethod {
        self.payment_methods
            .create(
                &self.actor,
                PaymentMethodInput {
                    name: name.into(),
                    commission_rate: rate,
                    require_unpaid_amount_check: false,
                    is_default_select: false,
                    status: PaymentMethodStatus::Active,
                },
            )
            .await
            .unwrap()
    }
}

pub fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn booking(room_id: u64, method_id: u64, start: &str, end: &str) -> CreateReservation {
    CreateReservation {
        payment_method_id: method_id,
        room_ids: vec![room_id],
        name: "guest".into(),
        phone: "010-1234-5678".into(),
        people_count: 2,
        stay_start_at: d(start),
        stay_end_at: d(end),
        price: 100_000,
        deposit: 0,
        payment_amount: 0,
        note: String::new(),
        status: ReservationStatus::Normal,
        reservation_type: ReservationType::Stay,
    }
}

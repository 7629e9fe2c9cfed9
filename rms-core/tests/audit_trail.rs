//! Audit trail and history reconstruction

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{booking, d, Env};
use rms_core::audit::{AuditAction, AuditLog, AuditLogFilter, AuditService};
use rms_core::db::{AuditLogRepository, RepoError, RepoResult};
use rms_core::history::HistoryType;
use rms_core::models::{ReservationStatus, UserSummary};
use rms_core::services::{DateBlockInput, ReservationPatch, ReservationService};

#[tokio::test]
async fn create_writes_snapshot_without_changed_fields() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;
    let created = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();

    let (entries, total) = env
        .audit
        .get_history("reservation", created.id, 0, 10)
        .await
        .unwrap();
    assert_eq!(total, 1);
    let entry = &entries[0];
    assert_eq!(entry.action, AuditAction::Create);
    assert!(entry.old_values.is_none());
    assert!(entry.changed_fields.is_none());
    assert_eq!(entry.user_id, Some(42));
    assert_eq!(entry.username, "front-desk");

    let snapshot = entry.new_values.as_ref().unwrap();
    assert_eq!(snapshot["stayStartAt"], "2026-06-10");
    assert_eq!(snapshot["rooms"][0]["number"], "101");
    assert_eq!(snapshot["paymentMethod"]["name"], "cash");
}

#[tokio::test]
async fn update_diff_names_exactly_the_touched_fields() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;
    let created = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();

    env.reservations
        .update(
            &env.actor,
            created.id,
            ReservationPatch {
                name: Some("other guest".into()),
                price: Some(150_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (entries, _) = env
        .audit
        .get_history("reservation", created.id, 0, 10)
        .await
        .unwrap();
    // Newest first
    assert_eq!(entries[0].action, AuditAction::Update);
    assert_eq!(entries[1].action, AuditAction::Create);

    let changed = entries[0].changed_fields.as_ref().unwrap();
    assert_eq!(changed, &["name".to_string(), "price".to_string()]);
    assert_eq!(entries[0].old_values.as_ref().unwrap()["price"], 100_000);
    assert_eq!(entries[0].new_values.as_ref().unwrap()["price"], 150_000);
}

#[tokio::test]
async fn no_op_update_still_leaves_an_entry() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;
    let created = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();

    env.reservations
        .update(&env.actor, created.id, ReservationPatch::default())
        .await
        .unwrap();

    let (entries, total) = env
        .audit
        .get_history("reservation", created.id, 0, 10)
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(entries[0].action, AuditAction::Update);
    // The event is recorded; the diff is just empty
    assert_eq!(entries[0].changed_fields.as_deref(), Some(&[][..]));
}

#[tokio::test]
async fn delete_records_the_final_state() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;
    let created = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    env.reservations.delete(&env.actor, created.id).await.unwrap();

    let (entries, total) = env
        .audit
        .get_history("reservation", created.id, 0, 10)
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(entries[0].action, AuditAction::Delete);
    assert!(entries[0].new_values.is_none());
    assert_eq!(entries[0].old_values.as_ref().unwrap()["name"], "guest");

    // The trail outlives the row
    assert!(env.reservations.get(created.id).await.is_err());
}

#[tokio::test]
async fn cross_entity_query_filters_by_type_and_action() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;
    env.reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    env.date_blocks
        .create(
            &env.actor,
            DateBlockInput {
                start_date: d("2026-09-01"),
                end_date: d("2026-09-02"),
                reason: "maintenance".into(),
            },
        )
        .await
        .unwrap();

    let (all, total) = env
        .audit
        .get_all_history(AuditLogFilter::default(), 0, 50)
        .await
        .unwrap();
    // Room + reservation + date block creations
    assert_eq!(total, 3);
    assert!(all.windows(2).all(|w| w[0].id > w[1].id));

    let (blocks_only, total) = env
        .audit
        .get_all_history(
            AuditLogFilter {
                entity_type: Some("date_block".into()),
                ..Default::default()
            },
            0,
            50,
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(blocks_only[0].entity_type, "date_block");
}

#[tokio::test]
async fn history_reconstructs_revisions_with_users() {
    let env = Env::new();
    env.store.put_user(UserSummary {
        id: 42,
        user_id: "fd-42".into(),
        email: "desk@example.com".into(),
        name: "Front Desk".into(),
    });
    let (_, room, method) = env.seed().await;
    let created = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    env.reservations
        .update(
            &env.actor,
            created.id,
            ReservationPatch {
                status: Some(ReservationStatus::Cancel),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (revisions, total) = env
        .history
        .reservation_history(created.id, 0, 10)
        .await
        .unwrap();
    assert_eq!(total, 2);

    assert_eq!(revisions[0].history_type, HistoryType::Updated);
    assert_eq!(revisions[0].entity.status, "CANCEL");
    assert!(revisions[0]
        .updated_fields
        .iter()
        .any(|f| f == "status"));
    assert_eq!(revisions[0].updated_by.name, "Front Desk");

    assert_eq!(revisions[1].history_type, HistoryType::Created);
    assert_eq!(revisions[1].entity.status, "NORMAL");
    assert!(revisions[1].updated_fields.is_empty());
}

#[tokio::test]
async fn unknown_user_collapses_to_id_only() {
    let env = Env::new();
    // No directory entry for actor 42
    let (_, room, method) = env.seed().await;
    let created = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();

    let (revisions, _) = env
        .history
        .reservation_history(created.id, 0, 10)
        .await
        .unwrap();
    assert_eq!(revisions[0].updated_by.id, 42);
    assert!(revisions[0].updated_by.name.is_empty());
}

#[tokio::test]
async fn room_history_renders_typed_views() {
    let env = Env::new();
    let (group, room, _) = env.seed().await;
    env.rooms
        .update(
            &env.actor,
            room.id,
            rms_core::services::RoomInput {
                number: "101".into(),
                room_group_id: group.id,
                note: "repainted".into(),
                status: rms_core::models::RoomStatus::Normal,
            },
        )
        .await
        .unwrap();

    let (revisions, total) = env.history.room_history(room.id, 0, 10).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(revisions[0].entity.note, "repainted");
    assert_eq!(revisions[0].updated_fields, vec!["note".to_string()]);
    assert_eq!(revisions[1].entity.number, "101");
}

/// Audit sink that always fails
struct BrokenAuditRepo;

#[async_trait]
impl AuditLogRepository for BrokenAuditRepo {
    async fn append(&self, _entry: AuditLog) -> RepoResult<AuditLog> {
        Err(RepoError::Database("audit store down".into()))
    }

    async fn find_by_entity(
        &self,
        _entity_type: &str,
        _entity_id: u64,
        _page: usize,
        _size: usize,
    ) -> RepoResult<(Vec<AuditLog>, u64)> {
        Err(RepoError::Database("audit store down".into()))
    }

    async fn find_filtered(
        &self,
        _filter: AuditLogFilter,
        _page: usize,
        _size: usize,
    ) -> RepoResult<(Vec<AuditLog>, u64)> {
        Err(RepoError::Database("audit store down".into()))
    }
}

#[tokio::test]
async fn mutations_survive_a_broken_audit_store() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;

    let broken = ReservationService::new(
        env.store.clone(),
        env.store.clone(),
        env.store.clone(),
        env.store.clone(),
        AuditService::new(Arc::new(BrokenAuditRepo)),
    );

    let created = broken
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    broken
        .update(
            &env.actor,
            created.id,
            ReservationPatch {
                note: Some("still fine".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    broken.delete(&env.actor, created.id).await.unwrap();
}

//! Availability: overlap arithmetic, date blocks, racing bookings

mod common;

use common::{booking, d, Env};
use rms_core::common::ServiceError;
use rms_core::db::StatisticsPeriod;
use rms_core::models::RoomStatus;
use rms_core::services::RoomInput;

#[tokio::test]
async fn overlapping_stay_conflicts_back_to_back_does_not() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;

    env.reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();

    // Jun 11-13 overlaps the night of the 11th
    assert!(matches!(
        env.reservations
            .create(&env.actor, booking(room.id, method.id, "2026-06-11", "2026-06-13"))
            .await
            .unwrap_err(),
        ServiceError::RoomNotAvailable
    ));

    // Checkout morning equals next check-in: fine
    env.reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-12", "2026-06-14"))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelling_frees_the_room() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;

    let first = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    env.reservations
        .update(
            &env.actor,
            first.id,
            rms_core::services::ReservationPatch {
                status: Some(rms_core::models::ReservationStatus::Cancel),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    env.reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
}

#[tokio::test]
async fn racing_bookings_resolve_to_one_winner() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;

    let a = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-08-01", "2026-08-03"));
    let b = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-08-02", "2026-08-04"));
    let (ra, rb) = futures::join!(a, b);

    let successes = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let loser = if ra.is_err() { ra } else { rb };
    assert!(matches!(loser.unwrap_err(), ServiceError::RoomNotAvailable));
}

#[tokio::test]
async fn available_rooms_exclude_booked_and_non_normal() {
    let env = Env::new();
    let (group, room_101, method) = env.seed().await;
    let room_102 = env.seed_room(&group, "102").await;
    env.rooms
        .create(
            &env.actor,
            RoomInput {
                number: "103".into(),
                room_group_id: group.id,
                note: String::new(),
                status: RoomStatus::UnderConstruction,
            },
        )
        .await
        .unwrap();

    env.reservations
        .create(&env.actor, booking(room_101.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();

    let free = env
        .reservations
        .get_available_rooms(d("2026-06-10"), d("2026-06-12"), None)
        .await
        .unwrap();
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].id, room_102.id);

    // Excluding the holder brings its room back, e.g. while editing it
    let holder = env
        .reservations
        .list(Default::default(), 0, 10)
        .await
        .unwrap()
        .0
        .pop()
        .unwrap();
    let free = env
        .reservations
        .get_available_rooms(d("2026-06-10"), d("2026-06-12"), Some(holder.id))
        .await
        .unwrap();
    assert_eq!(free.len(), 2);
}

#[tokio::test]
async fn statistics_bucket_by_period() {
    let env = Env::new();
    let (group, room_101, method) = env.seed().await;
    let room_102 = env.seed_room(&group, "102").await;

    env.reservations
        .create(&env.actor, booking(room_101.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    env.reservations
        .create(&env.actor, booking(room_102.id, method.id, "2026-06-10", "2026-06-11"))
        .await
        .unwrap();
    env.reservations
        .create(&env.actor, booking(room_101.id, method.id, "2026-07-01", "2026-07-03"))
        .await
        .unwrap();

    let daily = env
        .reservations
        .statistics(d("2026-06-01"), d("2026-06-30"), StatisticsPeriod::Daily)
        .await
        .unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].period, "2026-06-10");
    assert_eq!(daily[0].total_reservations, 2);
    assert_eq!(daily[0].total_sales, 200_000);
    assert_eq!(daily[0].total_guests, 4);
    // Two-night and one-night stays in the bucket
    assert_eq!(daily[0].average_stay_days, 1.5);

    let monthly = env
        .reservations
        .statistics(d("2026-06-01"), d("2026-07-31"), StatisticsPeriod::Monthly)
        .await
        .unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].period, "2026-06");
    assert_eq!(monthly[1].period, "2026-07");
    assert_eq!(monthly[1].total_reservations, 1);

    let yearly = env
        .reservations
        .statistics(d("2026-01-01"), d("2026-12-31"), StatisticsPeriod::Yearly)
        .await
        .unwrap();
    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly[0].period, "2026");
    assert_eq!(yearly[0].total_reservations, 3);
}

#[tokio::test]
async fn statistics_exclude_cancelled_and_refunded() {
    let env = Env::new();
    let (group, room_101, method) = env.seed().await;
    let room_102 = env.seed_room(&group, "102").await;

    let kept = env
        .reservations
        .create(&env.actor, booking(room_101.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    let cancelled = env
        .reservations
        .create(&env.actor, booking(room_102.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    env.reservations
        .update(
            &env.actor,
            cancelled.id,
            rms_core::services::ReservationPatch {
                status: Some(rms_core::models::ReservationStatus::Cancel),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let daily = env
        .reservations
        .statistics(d("2026-06-01"), d("2026-06-30"), StatisticsPeriod::Daily)
        .await
        .unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].total_reservations, 1);
    assert_eq!(daily[0].total_sales, kept.price);
    assert_eq!(daily[0].total_guests, 2);
}

#[tokio::test]
async fn last_for_room_picks_the_latest_stay() {
    let env = Env::new();
    let (_, room, method) = env.seed().await;

    assert!(env.reservations.last_for_room(room.id).await.unwrap().is_none());

    env.reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-10", "2026-06-12"))
        .await
        .unwrap();
    let later = env
        .reservations
        .create(&env.actor, booking(room.id, method.id, "2026-06-12", "2026-06-14"))
        .await
        .unwrap();

    let last = env.reservations.last_for_room(room.id).await.unwrap().unwrap();
    assert_eq!(last.id, later.id);

    assert!(matches!(
        env.reservations.last_for_room(9999).await.unwrap_err(),
        ServiceError::RoomNotFound
    ));
}

#[tokio::test]
async fn default_payment_method_flag_moves_atomically() {
    let env = Env::new();
    let cash = env.seed_method("cash", 0.0).await;
    let card = env.seed_method("card", 0.03).await;

    env.payment_methods
        .update(
            &env.actor,
            cash.id,
            rms_core::services::PaymentMethodInput {
                name: "cash".into(),
                commission_rate: 0.0,
                require_unpaid_amount_check: false,
                is_default_select: true,
                status: rms_core::models::PaymentMethodStatus::Active,
            },
        )
        .await
        .unwrap();
    env.payment_methods
        .update(
            &env.actor,
            card.id,
            rms_core::services::PaymentMethodInput {
                name: "card".into(),
                commission_rate: 0.03,
                require_unpaid_amount_check: false,
                is_default_select: true,
                status: rms_core::models::PaymentMethodStatus::Active,
            },
        )
        .await
        .unwrap();

    let (methods, _) = env.payment_methods.list(0, 10).await.unwrap();
    let defaults: Vec<_> = methods.iter().filter(|m| m.is_default_select).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, card.id);
}

//! Store- and service-level tests for the booking workflow: availability
//! checking, lifecycle gates, cascades, and the soft/hard delete split.

use chrono::{Days, Local, NaiveDate, NaiveTime};

use reservarr::db::{BookingChanges, NewBookingRow, NewUser, Store, UserUpdate};
use reservarr::models::{BookingStatus, TableStatus};
use reservarr::services::{BookingError, BookingService, SeaOrmBookingService};

async fn test_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("reservarr-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test store")
}

fn service(store: &Store) -> SeaOrmBookingService {
    SeaOrmBookingService::new(store.clone())
}

fn future_date(days: u64) -> NaiveDate {
    Local::now().date_naive() + Days::new(days)
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn seed_user(store: &Store, email: &str) -> i32 {
    store
        .create_user(NewUser {
            name: "Test Guest".to_string(),
            email: email.to_string(),
            password: "secret-password".to_string(),
            phone: None,
            role: None,
            is_active: true,
        })
        .await
        .expect("failed to seed user")
}

async fn seed_table(store: &Store, number: i32, seats: i32) -> i32 {
    store
        .create_table(number, seats, None)
        .await
        .expect("failed to seed table")
}

#[tokio::test]
async fn unavailable_status_overrides_time() {
    let store = test_store().await;
    let svc = service(&store);

    let table_id = store
        .create_table(1, 2, Some(TableStatus::Unavailable))
        .await
        .unwrap();

    let date = future_date(7);
    // No bookings exist at all, yet every slot is rejected.
    for t in [time(9, 0), time(12, 30), time(19, 0), time(23, 45)] {
        assert!(!svc.is_available(table_id, date, t).await.unwrap());
    }

    let user_id = seed_user(&store, "guest@example.com").await;
    let err = svc
        .create_booking(user_id, table_id, date, time(19, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::TableUnavailable));
}

#[tokio::test]
async fn missing_table_rejects() {
    let store = test_store().await;
    let svc = service(&store);

    assert!(!svc.is_available(9999, future_date(1), time(18, 0)).await.unwrap());

    let user_id = seed_user(&store, "guest@example.com").await;
    let err = svc
        .create_booking(user_id, 9999, future_date(1), time(18, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::TableNotFound));
}

#[tokio::test]
async fn one_hour_buffer_is_strict() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;
    let date = future_date(14);

    svc.create_booking(user_id, table_id, date, time(19, 0))
        .await
        .unwrap();

    // Strictly inside the window: rejected.
    assert!(!svc.is_available(table_id, date, time(19, 30)).await.unwrap());
    assert!(!svc.is_available(table_id, date, time(18, 30)).await.unwrap());
    // 3599 seconds away: still rejected.
    let just_inside_after = NaiveTime::from_hms_opt(19, 59, 59).unwrap();
    let just_inside_before = NaiveTime::from_hms_opt(18, 0, 1).unwrap();
    assert!(!svc.is_available(table_id, date, just_inside_after).await.unwrap());
    assert!(!svc.is_available(table_id, date, just_inside_before).await.unwrap());
    // Exactly 3600 seconds away: admitted.
    assert!(svc.is_available(table_id, date, time(20, 0)).await.unwrap());
    assert!(svc.is_available(table_id, date, time(18, 0)).await.unwrap());

    let err = svc
        .create_booking(user_id, table_id, date, time(19, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::TimeConflict));

    // The boundary slot can actually be booked.
    svc.create_booking(user_id, table_id, date, time(20, 0))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_bookings_are_invisible() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;
    let date = future_date(10);

    let booking_id = svc
        .create_booking(user_id, table_id, date, time(19, 0))
        .await
        .unwrap();

    assert!(!svc.is_available(table_id, date, time(19, 0)).await.unwrap());

    // Cancellation is a status update, not a distinct operation.
    let updated = svc
        .update_booking(
            booking_id,
            BookingChanges {
                status: Some(BookingStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated);

    assert!(svc.is_available(table_id, date, time(19, 0)).await.unwrap());
    svc.create_booking(user_id, table_id, date, time(19, 0))
        .await
        .unwrap();
}

#[tokio::test]
async fn pending_bookings_block_the_slot() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;
    let date = future_date(5);

    // A store-level insert can carry `pending`; the conflict scan must
    // treat it as active.
    store
        .create_booking_row(NewBookingRow {
            user_id,
            table_id,
            booking_date: date,
            booking_time: time(19, 0),
            status: BookingStatus::Pending,
        })
        .await
        .unwrap();

    assert!(!svc.is_available(table_id, date, time(19, 30)).await.unwrap());
}

#[tokio::test]
async fn past_dates_are_rejected() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;
    let yesterday = Local::now().date_naive() - Days::new(1);

    let err = svc
        .create_booking(user_id, table_id, yesterday, time(19, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::PastDate));

    // Rescheduling onto a past date fails the same gate.
    let booking_id = svc
        .create_booking(user_id, table_id, future_date(3), time(19, 0))
        .await
        .unwrap();
    let err = svc
        .update_booking(
            booking_id,
            BookingChanges {
                booking_date: Some(yesterday),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::PastDate));
}

#[tokio::test]
async fn creation_forces_reserved_status() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;

    let booking_id = svc
        .create_booking(user_id, table_id, future_date(2), time(18, 0))
        .await
        .unwrap();

    let booking = store.get_booking(booking_id).await.unwrap().unwrap();
    assert_eq!(booking.status, "reserved");
}

#[tokio::test]
async fn reschedule_rechecks_availability() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;
    let date = future_date(21);

    svc.create_booking(user_id, table_id, date, time(19, 0))
        .await
        .unwrap();
    let second = svc
        .create_booking(user_id, table_id, date, time(21, 0))
        .await
        .unwrap();

    // Moving the second booking into the first one's window is caught.
    let err = svc
        .update_booking(
            second,
            BookingChanges {
                booking_time: Some(time(19, 30)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::TimeConflict));

    // The boundary slot is fine.
    let updated = svc
        .update_booking(
            second,
            BookingChanges {
                booking_time: Some(time(20, 0)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated);

    let booking = store.get_booking(second).await.unwrap().unwrap();
    assert_eq!(booking.booking_time, time(20, 0));
}

#[tokio::test]
async fn reschedule_does_not_conflict_with_itself() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;
    let date = future_date(4);

    let booking_id = svc
        .create_booking(user_id, table_id, date, time(19, 0))
        .await
        .unwrap();

    // Nudging a booking by 15 minutes stays within its own old window; the
    // scan must exclude the booking under update.
    let updated = svc
        .update_booking(
            booking_id,
            BookingChanges {
                booking_time: Some(time(19, 15)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated);
}

#[tokio::test]
async fn delete_table_cascades_to_bookings() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;

    let booking_id = svc
        .create_booking(user_id, table_id, future_date(6), time(19, 0))
        .await
        .unwrap();

    assert!(store.delete_table(table_id).await.unwrap());

    assert!(store.get_booking(booking_id).await.unwrap().is_none());
    assert!(store.bookings_for_table(table_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn hard_delete_user_cascades_to_bookings() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;

    let booking_id = svc
        .create_booking(user_id, table_id, future_date(6), time(19, 0))
        .await
        .unwrap();

    assert_eq!(store.bookings_for_user(user_id).await.unwrap().len(), 1);

    assert!(store.delete_user(user_id).await.unwrap());

    assert!(store.get_user(user_id).await.unwrap().is_none());
    assert!(store.get_booking(booking_id).await.unwrap().is_none());
    assert!(store.bookings_for_user(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn soft_delete_keeps_the_row() {
    let store = test_store().await;

    let user_id = seed_user(&store, "guest@example.com").await;

    assert!(store.deactivate_user(user_id).await.unwrap());

    let user = store.get_user(user_id).await.unwrap().unwrap();
    assert!(!user.is_active);

    // Hard delete removes the row entirely.
    assert!(store.delete_user(user_id).await.unwrap());
    assert!(store.get_user(user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn table_round_trip() {
    let store = test_store().await;

    store.create_table(7, 4, None).await.unwrap();

    let table = store.get_table_by_number(7).await.unwrap().unwrap();
    assert_eq!(table.seats, 4);
    assert_eq!(table.status, "available");

    assert!(store.table_exists(7).await.unwrap());
    assert!(!store.table_exists(99).await.unwrap());
}

#[tokio::test]
async fn flipping_table_status_closes_existing_slots() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;
    let date = future_date(9);

    svc.create_booking(user_id, table_id, date, time(19, 0))
        .await
        .unwrap();

    // The operator override wins over everything, including free slots.
    assert!(store.set_table_status(table_id, TableStatus::Unavailable).await.unwrap());
    assert!(!svc.is_available(table_id, date, time(12, 0)).await.unwrap());

    assert!(store.set_table_status(table_id, TableStatus::Available).await.unwrap());
    assert!(svc.is_available(table_id, date, time(12, 0)).await.unwrap());
}

#[tokio::test]
async fn availability_scenario_table_seven() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 7, 4).await;
    let date = future_date(30);

    svc.create_booking(user_id, table_id, date, time(19, 0))
        .await
        .unwrap();

    // 1800 s away: reject. Exactly 3600 s: admit. Different date: admit.
    assert!(!svc.is_available(table_id, date, time(19, 30)).await.unwrap());
    assert!(svc.is_available(table_id, date, time(20, 0)).await.unwrap());
    assert!(
        svc.is_available(table_id, date + Days::new(1), time(19, 0))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn duplicate_email_surfaces_as_error() {
    let store = test_store().await;

    let first = seed_user(&store, "dup@example.com").await;
    let by_email = store
        .get_user_by_email("dup@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, first);

    let err = store
        .create_user(NewUser {
            name: "Other".to_string(),
            email: "dup@example.com".to_string(),
            password: "another-password".to_string(),
            phone: None,
            role: None,
            is_active: true,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().to_uppercase().contains("UNIQUE"));
}

#[tokio::test]
async fn password_verification_and_change() {
    let store = test_store().await;

    let user_id = seed_user(&store, "guest@example.com").await;

    let user = store
        .verify_user_password("guest@example.com", "secret-password")
        .await
        .unwrap()
        .expect("correct password should verify");
    assert_eq!(user.id, user_id);

    assert!(
        store
            .verify_user_password("guest@example.com", "wrong")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .verify_user_password("nobody@example.com", "secret-password")
            .await
            .unwrap()
            .is_none()
    );

    // Change requires the old password.
    assert!(
        !store
            .change_user_password(user_id, "wrong", "new-password-123")
            .await
            .unwrap()
    );
    assert!(
        store
            .change_user_password(user_id, "secret-password", "new-password-123")
            .await
            .unwrap()
    );
    assert!(
        store
            .verify_user_password("guest@example.com", "new-password-123")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn deleting_booking_leaves_table_status_alone() {
    let store = test_store().await;
    let svc = service(&store);

    let user_id = seed_user(&store, "guest@example.com").await;
    let table_id = seed_table(&store, 1, 4).await;

    let booking_id = svc
        .create_booking(user_id, table_id, future_date(8), time(19, 0))
        .await
        .unwrap();

    assert!(svc.delete_booking(booking_id).await.unwrap());

    let table = store.get_table(table_id).await.unwrap().unwrap();
    assert_eq!(table.status, "available");
}

#[tokio::test]
async fn seat_count_gate_rejects_zero() {
    let store = test_store().await;

    assert!(store.create_table(1, 0, None).await.is_err());
    assert!(store.create_table(1, -3, None).await.is_err());

    let table_id = store.create_table(1, 4, None).await.unwrap();
    assert!(
        store
            .update_table(
                table_id,
                reservarr::db::TableUpdate {
                    seats: Some(0),
                    ..Default::default()
                },
            )
            .await
            .is_err()
    );
}

#[tokio::test]
async fn update_user_is_partial() {
    let store = test_store().await;

    let user_id = seed_user(&store, "guest@example.com").await;

    let updated = store
        .update_user(
            user_id,
            UserUpdate {
                phone: Some("+1-555-0100".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated);

    let user = store.get_user(user_id).await.unwrap().unwrap();
    assert_eq!(user.phone.as_deref(), Some("+1-555-0100"));
    assert_eq!(user.name, "Test Guest");
    assert_eq!(user.role, "client");

    // No fields supplied: nothing to do.
    assert!(!store.update_user(user_id, UserUpdate::default()).await.unwrap());
}

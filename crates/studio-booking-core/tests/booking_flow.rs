//! Booking orchestrator integration tests
//!
//! Exercises the invariants the orchestrator protects: no overbooking,
//! cancellation restores exactly one seat, duplicates and double cancels
//! are rejected, and the membership allowance gates booking.

mod common;

use std::sync::Arc;

use common::{MockBookingRepository, MockClassRepository, MockMembershipRepository};
use studio_booking_core::{BookingError, BookingService, LedgerChangeKind};
use studio_db::BookingRepository;
use studio_types::{ClassId, UserId};

fn service(
    classes: &MockClassRepository,
    bookings: &MockBookingRepository,
    memberships: &MockMembershipRepository,
) -> BookingService<MockClassRepository, MockBookingRepository, MockMembershipRepository> {
    BookingService::new(
        Arc::new(classes.clone()),
        Arc::new(bookings.clone()),
        Arc::new(memberships.clone()),
    )
}

fn fixture() -> (
    MockClassRepository,
    MockBookingRepository,
    MockMembershipRepository,
) {
    let classes = MockClassRepository::new();
    let bookings = MockBookingRepository::new(&classes);
    let memberships = MockMembershipRepository::new();
    (classes, bookings, memberships)
}

// ============================================================================
// Booking
// ============================================================================

#[tokio::test]
async fn ladies_yoga_scenario() {
    let (classes, bookings, memberships) = fixture();
    let yoga = MockClassRepository::test_class("Ladies Yoga", 12);
    let class_id = ClassId::from(yoga.id);
    classes.insert_class(yoga);

    let svc = service(&classes, &bookings, &memberships);

    let first = svc.book(UserId::new(), class_id, None).await.unwrap();
    assert_eq!(classes.spots_left(class_id.0), Some(11));

    svc.book(UserId::new(), class_id, None).await.unwrap();
    assert_eq!(classes.spots_left(class_id.0), Some(10));

    svc.cancel(first.id).await.unwrap();
    assert_eq!(classes.spots_left(class_id.0), Some(11));
}

#[tokio::test]
async fn single_class_availability_tracks_bookings() {
    let (classes, bookings, memberships) = fixture();
    let spin = MockClassRepository::test_class("Spin", 20);
    let class_id = ClassId::from(spin.id);
    classes.insert_class(spin);

    let svc = service(&classes, &bookings, &memberships);
    svc.book(UserId::new(), class_id, None).await.unwrap();

    let class = svc.class_availability(class_id).await.unwrap();
    assert_eq!(class.spots_left, 19);
    assert!(class.has_space());

    let err = svc.class_availability(ClassId::new()).await.unwrap_err();
    assert!(matches!(err, BookingError::ClassNotFound));
}

#[tokio::test]
async fn booking_missing_class_fails() {
    let (classes, bookings, memberships) = fixture();
    let svc = service(&classes, &bookings, &memberships);

    let err = svc
        .book(UserId::new(), ClassId::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::ClassNotFound));
}

#[tokio::test]
async fn full_class_rejects_with_class_full() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Strength Basics", 1);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    svc.book(UserId::new(), class_id, None).await.unwrap();

    let err = svc.book(UserId::new(), class_id, None).await.unwrap_err();
    assert!(matches!(err, BookingError::ClassFull));
    assert_eq!(classes.spots_left(class_id.0), Some(0));
}

#[tokio::test]
async fn duplicate_confirmed_booking_rejected() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Pilates", 14);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    let user = UserId::new();

    svc.book(user, class_id, None).await.unwrap();
    let err = svc.book(user, class_id, None).await.unwrap_err();
    assert!(matches!(err, BookingError::AlreadyBooked));

    // The rejected attempt must not have taken a seat
    assert_eq!(classes.spots_left(class_id.0), Some(13));
}

#[tokio::test]
async fn rebooking_after_cancel_is_allowed() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Spin", 20);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    let user = UserId::new();

    let booking = svc.book(user, class_id, None).await.unwrap();
    svc.cancel(booking.id).await.unwrap();
    svc.book(user, class_id, None).await.unwrap();

    assert_eq!(classes.spots_left(class_id.0), Some(19));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_bookings_never_overbook() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Boxfit", 5);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = Arc::new(service(&classes, &bookings, &memberships));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            svc.book(UserId::new(), class_id, None).await
        }));
    }

    let mut successes = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(BookingError::ClassFull) => full += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 5);
    assert_eq!(full, 15);
    assert_eq!(classes.spots_left(class_id.0), Some(0));
    assert_eq!(
        bookings.count_confirmed_for_class(class_id.0).await.unwrap(),
        5
    );
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn cancel_unknown_booking_fails() {
    let (classes, bookings, memberships) = fixture();
    let svc = service(&classes, &bookings, &memberships);

    let err = svc.cancel(studio_types::BookingId::new()).await.unwrap_err();
    assert!(matches!(err, BookingError::BookingNotFound));
}

#[tokio::test]
async fn double_cancel_rejected_without_double_increment() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Ladies Yoga", 12);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    let booking = svc.book(UserId::new(), class_id, None).await.unwrap();

    svc.cancel(booking.id).await.unwrap();
    assert_eq!(classes.spots_left(class_id.0), Some(12));

    let err = svc.cancel(booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::AlreadyCancelled));
    // Seat count unchanged by the rejected second cancel
    assert_eq!(classes.spots_left(class_id.0), Some(12));
}

#[tokio::test]
async fn cancel_with_deleted_class_leaves_booking_untouched() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Pilates", 14);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    let booking = svc.book(UserId::new(), class_id, None).await.unwrap();

    classes.delete_class(class_id.0);

    let err = svc.cancel(booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::ClassNotFound));
    assert_eq!(
        bookings.booking_status(booking.id.0).as_deref(),
        Some("confirmed")
    );
}

// ============================================================================
// Capacity invariant
// ============================================================================

#[tokio::test]
async fn spots_left_equals_capacity_minus_confirmed() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Circuits", 18);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);

    let mut ids = Vec::new();
    for _ in 0..6 {
        ids.push(svc.book(UserId::new(), class_id, None).await.unwrap().id);
    }
    svc.cancel(ids[0]).await.unwrap();
    svc.cancel(ids[1]).await.unwrap();

    let confirmed = bookings.count_confirmed_for_class(class_id.0).await.unwrap();
    let spots_left = classes.spots_left(class_id.0).unwrap();
    assert_eq!(spots_left as i64, 18 - confirmed);
}

// ============================================================================
// Membership allowance
// ============================================================================

#[tokio::test]
async fn class_limit_blocks_booking_when_spent() {
    let (classes, bookings, memberships) = fixture();
    let class_a = MockClassRepository::test_class("Spin", 20);
    let class_b = MockClassRepository::test_class("Pilates", 14);
    let class_c = MockClassRepository::test_class("Boxfit", 16);
    let (a, b, c) = (
        ClassId::from(class_a.id),
        ClassId::from(class_b.id),
        ClassId::from(class_c.id),
    );
    classes.insert_class(class_a);
    classes.insert_class(class_b);
    classes.insert_class(class_c);

    let user = UserId::new();
    // Bronze grants 4 classes per cycle
    memberships.insert_membership(MockMembershipRepository::test_membership(user.0, "bronze"));

    let svc = service(&classes, &bookings, &memberships);

    svc.book(user, a, None).await.unwrap();
    svc.book(user, b, None).await.unwrap();
    svc.book(user, c, None).await.unwrap();

    // Fourth distinct class exhausts bronze's allowance on the next attempt
    let class_d = MockClassRepository::test_class("Circuits", 18);
    let d = ClassId::from(class_d.id);
    classes.insert_class(class_d);
    svc.book(user, d, None).await.unwrap();

    let class_e = MockClassRepository::test_class("Power Yoga", 12);
    let e = ClassId::from(class_e.id);
    classes.insert_class(class_e);
    let err = svc.book(user, e, None).await.unwrap_err();
    assert!(matches!(err, BookingError::ClassLimitReached));
}

#[tokio::test]
async fn gold_membership_is_unlimited() {
    let (classes, bookings, memberships) = fixture();
    let user = UserId::new();
    memberships.insert_membership(MockMembershipRepository::test_membership(user.0, "gold"));

    let svc = service(&classes, &bookings, &memberships);

    for i in 0..10 {
        let class = MockClassRepository::test_class(&format!("Class {i}"), 20);
        let id = ClassId::from(class.id);
        classes.insert_class(class);
        svc.book(user, id, None).await.unwrap();
    }
}

// ============================================================================
// Attendance
// ============================================================================

#[tokio::test]
async fn attendance_marked_on_confirmed_booking() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Ladies Yoga", 12);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    let booking = svc.book(UserId::new(), class_id, None).await.unwrap();

    let admin = UserId::new();
    let marked = svc
        .mark_attendance(booking.id, true, admin, Some("arrived late".into()))
        .await
        .unwrap();

    let attendance = marked.attendance.unwrap();
    assert!(attendance.attended);
    assert_eq!(attendance.marked_by, admin);
    assert_eq!(attendance.notes.as_deref(), Some("arrived late"));
}

#[tokio::test]
async fn attendance_rejected_on_cancelled_booking() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Spin", 20);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    let booking = svc.book(UserId::new(), class_id, None).await.unwrap();
    svc.cancel(booking.id).await.unwrap();

    let err = svc
        .mark_attendance(booking.id, true, UserId::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::BookingCancelled));
}

// ============================================================================
// Availability feed
// ============================================================================

#[tokio::test]
async fn feed_publishes_snapshot_after_booking() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Ladies Yoga", 12);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    let mut sub = svc.feed().subscribe();
    let mut changes = svc.feed().subscribe_changes();

    let booking = svc.book(UserId::new(), class_id, None).await.unwrap();

    let change = changes.recv().await.unwrap();
    assert_eq!(change.kind, LedgerChangeKind::Booked);
    assert_eq!(change.booking_id, booking.id);

    let snapshot = sub.changed().await.unwrap();
    assert_eq!(snapshot.class(class_id).unwrap().spots_left, 11);
}

#[tokio::test]
async fn guest_info_is_preserved() {
    let (classes, bookings, memberships) = fixture();
    let class = MockClassRepository::test_class("Boxfit", 16);
    let class_id = ClassId::from(class.id);
    classes.insert_class(class);

    let svc = service(&classes, &bookings, &memberships);
    let booking = svc
        .book(
            UserId::new(),
            class_id,
            Some(studio_types::GuestInfo {
                name: "Walk-in Wendy".into(),
                phone: Some("07700900123".into()),
            }),
        )
        .await
        .unwrap();

    let guest = booking.guest.unwrap();
    assert_eq!(guest.name, "Walk-in Wendy");
}

//! Repository traits
//!
//! Async repository interfaces over the backing store. Write outcomes that
//! the orchestrator must distinguish (class full, slot conflict, already
//! cancelled) are modelled as enums rather than errors: they are expected
//! states, not failures of the store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// Class catalog repository trait
#[async_trait]
pub trait ClassRepository: Send + Sync {
    /// Find a class by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ClassRow>>;

    /// List the whole catalog with live availability, in timetable order
    async fn list(&self) -> DbResult<Vec<ClassRow>>;

    /// Insert seed offerings, skipping any that already exist
    async fn seed(&self, classes: &[SeedClass]) -> DbResult<u64>;
}

/// Seed input for a class offering
#[derive(Debug, Clone)]
pub struct SeedClass {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub day: String,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub instructor: String,
    pub capacity: i32,
}

/// Outcome of the transactional book write
#[derive(Debug, Clone)]
pub enum BookingWrite {
    /// Seat taken and booking recorded
    Created(BookingRow),
    /// No seats left; nothing was written
    ClassFull,
    /// Class does not exist; nothing was written
    ClassNotFound,
    /// The user already holds a confirmed booking for this class
    AlreadyBooked,
}

/// Outcome of the transactional cancel write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelWrite {
    /// Status flipped and seat restored
    Cancelled,
    /// No booking with that ID
    BookingNotFound,
    /// Booking exists but is not confirmed; nothing was written
    AlreadyCancelled,
    /// The class row is gone; booking left untouched
    ClassNotFound,
}

/// Outcome of an attendance write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceWrite {
    Marked,
    BookingNotFound,
    /// Attendance cannot be marked on a cancelled booking
    BookingCancelled,
}

/// Booking creation input
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub id: Uuid,
    pub class_id: Uuid,
    pub user_id: Uuid,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
}

/// Booking ledger repository trait
///
/// `book` and `cancel` are the only paths that may touch `spots_left`; both
/// apply the ledger write and the capacity write in one transaction.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Atomically check-and-decrement capacity and insert a confirmed booking
    async fn book(&self, create: CreateBooking) -> DbResult<BookingWrite>;

    /// Atomically cancel a confirmed booking and restore its seat
    async fn cancel(&self, booking_id: Uuid) -> DbResult<CancelWrite>;

    /// Find a booking by ID
    async fn find_by_id(&self, booking_id: Uuid) -> DbResult<Option<BookingRow>>;

    /// All confirmed bookings for a user, newest first
    async fn find_confirmed_by_user(&self, user_id: Uuid) -> DbResult<Vec<BookingRow>>;

    /// Count a user's confirmed bookings made since `since`
    async fn count_confirmed_since(&self, user_id: Uuid, since: DateTime<Utc>) -> DbResult<i64>;

    /// Count confirmed bookings for a class (invariant audits)
    async fn count_confirmed_for_class(&self, class_id: Uuid) -> DbResult<i64>;

    /// Record attendance on a non-cancelled booking
    async fn mark_attendance(
        &self,
        booking_id: Uuid,
        attended: bool,
        marked_by: Uuid,
        notes: Option<String>,
    ) -> DbResult<AttendanceWrite>;
}

/// Outcome of the transactional hall-hire insert
#[derive(Debug, Clone)]
pub enum HallWrite {
    Created(HallHireRow),
    /// An existing non-cancelled booking overlaps the requested interval
    Conflict,
}

/// Hall-hire creation input
#[derive(Debug, Clone)]
pub struct CreateHallBooking {
    pub id: Uuid,
    pub package_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub event_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub expected_attendees: i32,
    pub event_type: String,
    pub special_requirements: Option<String>,
    pub total_price_cents: i64,
}

/// Hall-hire repository trait
#[async_trait]
pub trait HallHireRepository: Send + Sync {
    /// Non-cancelled bookings on a calendar date
    async fn find_active_on_date(&self, date: NaiveDate) -> DbResult<Vec<HallHireRow>>;

    /// Insert a pending booking only if no non-cancelled booking overlaps;
    /// the overlap check and the insert run in one serializable transaction
    async fn insert_if_free(&self, create: CreateHallBooking) -> DbResult<HallWrite>;

    /// Find a hall booking by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<HallHireRow>>;

    /// Update booking status (confirm / cancel)
    async fn update_status(&self, id: Uuid, status: &str) -> DbResult<()>;
}

/// Membership repository trait
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find a user's membership
    async fn find_by_user(&self, user_id: Uuid) -> DbResult<Option<MembershipRow>>;

    /// Create a membership for a user, ignoring an existing row
    async fn create(&self, user_id: Uuid, tier: &str) -> DbResult<()>;

    /// Apply a tier change immediately and clear any pending change
    async fn set_tier(&self, user_id: Uuid, tier: &str) -> DbResult<()>;

    /// Schedule a deferred tier change; current tier stays in force
    async fn schedule_change(
        &self,
        user_id: Uuid,
        tier: &str,
        effective: DateTime<Utc>,
    ) -> DbResult<()>;

    /// Append a payment history entry
    async fn record_payment(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        description: &str,
    ) -> DbResult<()>;

    /// Payment history, newest first
    async fn list_payments(&self, user_id: Uuid) -> DbResult<Vec<PaymentRow>>;
}

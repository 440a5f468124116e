//! Mock repositories for testing
//!
//! In-memory stands-ins with the same write-outcome semantics as the
//! Postgres implementations. The capacity decrement goes through a per-class
//! `get_mut`, which holds the map entry for the duration of the
//! check-and-decrement, mirroring the row lock the real transaction takes.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use studio_booking_core::intervals_overlap;
use studio_db::{
    AttendanceWrite, BookingRepository, BookingRow, BookingWrite, CancelWrite, ClassRepository,
    ClassRow, CreateBooking, CreateHallBooking, DbResult, HallHireRepository, HallHireRow,
    HallWrite, MembershipRepository, MembershipRow, PaymentRow, SeedClass,
};
use studio_notify::{EmailMessage, Mailer, NotifyError, SentEmail};

/// In-memory class catalog
#[derive(Default, Clone)]
pub struct MockClassRepository {
    classes: Arc<DashMap<Uuid, ClassRow>>,
}

impl MockClassRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a class directly
    pub fn insert_class(&self, class: ClassRow) {
        self.classes.insert(class.id, class);
    }

    /// Remove a class row, orphaning its bookings
    pub fn delete_class(&self, id: Uuid) {
        self.classes.remove(&id);
    }

    /// Build a class row with full availability
    pub fn test_class(name: &str, capacity: i32) -> ClassRow {
        ClassRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: "yoga".to_string(),
            day: "tue".to_string(),
            start_time: chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            duration_minutes: 60,
            instructor: "Sarah".to_string(),
            capacity,
            spots_left: capacity,
        }
    }

    pub fn spots_left(&self, id: Uuid) -> Option<i32> {
        self.classes.get(&id).map(|c| c.spots_left)
    }
}

#[async_trait]
impl ClassRepository for MockClassRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ClassRow>> {
        Ok(self.classes.get(&id).map(|r| r.value().clone()))
    }

    async fn list(&self) -> DbResult<Vec<ClassRow>> {
        let mut all: Vec<_> = self.classes.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| (a.day.clone(), a.start_time).cmp(&(b.day.clone(), b.start_time)));
        Ok(all)
    }

    async fn seed(&self, classes: &[SeedClass]) -> DbResult<u64> {
        let mut inserted = 0;
        for c in classes {
            if !self.classes.contains_key(&c.id) {
                self.classes.insert(
                    c.id,
                    ClassRow {
                        id: c.id,
                        name: c.name.clone(),
                        category: c.category.clone(),
                        day: c.day.clone(),
                        start_time: c.start_time,
                        duration_minutes: c.duration_minutes,
                        instructor: c.instructor.clone(),
                        capacity: c.capacity,
                        spots_left: c.capacity,
                    },
                );
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

/// In-memory booking ledger sharing the class map for capacity writes
#[derive(Clone)]
pub struct MockBookingRepository {
    bookings: Arc<DashMap<Uuid, BookingRow>>,
    classes: Arc<DashMap<Uuid, ClassRow>>,
}

impl MockBookingRepository {
    /// Tie the ledger to a class catalog so book/cancel can move seats
    pub fn new(classes: &MockClassRepository) -> Self {
        Self {
            bookings: Arc::new(DashMap::new()),
            classes: Arc::clone(&classes.classes),
        }
    }

    pub fn booking_status(&self, id: Uuid) -> Option<String> {
        self.bookings.get(&id).map(|b| b.status.clone())
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn book(&self, create: CreateBooking) -> DbResult<BookingWrite> {
        let duplicate = self.bookings.iter().any(|b| {
            b.user_id == create.user_id
                && b.class_id == create.class_id
                && b.status == "confirmed"
        });
        if duplicate {
            return Ok(BookingWrite::AlreadyBooked);
        }

        // Entry lock makes the check-and-decrement atomic per class
        match self.classes.get_mut(&create.class_id) {
            None => Ok(BookingWrite::ClassNotFound),
            Some(mut class) => {
                if class.spots_left <= 0 {
                    return Ok(BookingWrite::ClassFull);
                }
                class.spots_left -= 1;
                let row = BookingRow {
                    id: create.id,
                    class_id: create.class_id,
                    user_id: create.user_id,
                    status: "confirmed".to_string(),
                    booked_at: Utc::now(),
                    attended: None,
                    marked_by: None,
                    marked_at: None,
                    notes: None,
                    guest_name: create.guest_name,
                    guest_phone: create.guest_phone,
                };
                self.bookings.insert(row.id, row.clone());
                Ok(BookingWrite::Created(row))
            }
        }
    }

    async fn cancel(&self, booking_id: Uuid) -> DbResult<CancelWrite> {
        let Some(mut booking) = self.bookings.get_mut(&booking_id) else {
            return Ok(CancelWrite::BookingNotFound);
        };
        if booking.status != "confirmed" {
            return Ok(CancelWrite::AlreadyCancelled);
        }

        let class_id = booking.class_id;
        match self.classes.get_mut(&class_id) {
            None => Ok(CancelWrite::ClassNotFound),
            Some(mut class) => {
                class.spots_left = (class.spots_left + 1).min(class.capacity);
                booking.status = "cancelled".to_string();
                Ok(CancelWrite::Cancelled)
            }
        }
    }

    async fn find_by_id(&self, booking_id: Uuid) -> DbResult<Option<BookingRow>> {
        Ok(self.bookings.get(&booking_id).map(|r| r.value().clone()))
    }

    async fn find_confirmed_by_user(&self, user_id: Uuid) -> DbResult<Vec<BookingRow>> {
        let mut rows: Vec<_> = self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id && b.status == "confirmed")
            .map(|b| b.value().clone())
            .collect();
        rows.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(rows)
    }

    async fn count_confirmed_since(&self, user_id: Uuid, since: DateTime<Utc>) -> DbResult<i64> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id && b.status == "confirmed" && b.booked_at >= since)
            .count() as i64)
    }

    async fn count_confirmed_for_class(&self, class_id: Uuid) -> DbResult<i64> {
        Ok(self
            .bookings
            .iter()
            .filter(|b| b.class_id == class_id && b.status == "confirmed")
            .count() as i64)
    }

    async fn mark_attendance(
        &self,
        booking_id: Uuid,
        attended: bool,
        marked_by: Uuid,
        notes: Option<String>,
    ) -> DbResult<AttendanceWrite> {
        let Some(mut booking) = self.bookings.get_mut(&booking_id) else {
            return Ok(AttendanceWrite::BookingNotFound);
        };
        if booking.status == "cancelled" {
            return Ok(AttendanceWrite::BookingCancelled);
        }
        booking.attended = Some(attended);
        booking.marked_by = Some(marked_by);
        booking.marked_at = Some(Utc::now());
        booking.notes = notes;
        Ok(AttendanceWrite::Marked)
    }
}

/// In-memory hall-hire store
///
/// A single mutex serializes `insert_if_free`, standing in for the
/// serializable transaction of the real repository.
#[derive(Default, Clone)]
pub struct MockHallHireRepository {
    bookings: Arc<DashMap<Uuid, HallHireRow>>,
    write_lock: Arc<Mutex<()>>,
}

impl MockHallHireRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_booking(&self, row: HallHireRow) {
        self.bookings.insert(row.id, row);
    }

    pub fn count(&self) -> usize {
        self.bookings.len()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.bookings.contains_key(&id)
    }
}

#[async_trait]
impl HallHireRepository for MockHallHireRepository {
    async fn find_active_on_date(&self, date: NaiveDate) -> DbResult<Vec<HallHireRow>> {
        let mut rows: Vec<_> = self
            .bookings
            .iter()
            .filter(|b| b.event_date == date && b.status != "cancelled")
            .map(|b| b.value().clone())
            .collect();
        rows.sort_by_key(|b| b.start_time);
        Ok(rows)
    }

    async fn insert_if_free(&self, create: CreateHallBooking) -> DbResult<HallWrite> {
        let _guard = self.write_lock.lock().await;

        let conflict = self.bookings.iter().any(|b| {
            b.event_date == create.event_date
                && b.status != "cancelled"
                && intervals_overlap(b.start_time, b.end_time, create.start_time, create.end_time)
        });
        if conflict {
            return Ok(HallWrite::Conflict);
        }

        let row = HallHireRow {
            id: create.id,
            package_id: create.package_id,
            customer_name: create.customer_name,
            customer_email: create.customer_email,
            customer_phone: create.customer_phone,
            event_date: create.event_date,
            start_time: create.start_time,
            end_time: create.end_time,
            expected_attendees: create.expected_attendees,
            event_type: create.event_type,
            special_requirements: create.special_requirements,
            total_price_cents: create.total_price_cents,
            status: "pending".to_string(),
            created_at: Utc::now(),
        };
        self.bookings.insert(row.id, row.clone());
        Ok(HallWrite::Created(row))
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<HallHireRow>> {
        Ok(self.bookings.get(&id).map(|r| r.value().clone()))
    }

    async fn update_status(&self, id: Uuid, status: &str) -> DbResult<()> {
        if let Some(mut row) = self.bookings.get_mut(&id) {
            row.status = status.to_string();
        }
        Ok(())
    }
}

/// In-memory membership store
#[derive(Default, Clone)]
pub struct MockMembershipRepository {
    memberships: Arc<DashMap<Uuid, MembershipRow>>,
    payments: Arc<Mutex<Vec<PaymentRow>>>,
}

impl MockMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a membership directly
    pub fn insert_membership(&self, row: MembershipRow) {
        self.memberships.insert(row.user_id, row);
    }

    pub fn test_membership(user_id: Uuid, tier: &str) -> MembershipRow {
        MembershipRow {
            user_id,
            tier: tier.to_string(),
            pending_tier: None,
            change_effective_date: None,
            cycle_started_at: Utc::now() - chrono::Duration::days(5),
        }
    }
}

#[async_trait]
impl MembershipRepository for MockMembershipRepository {
    async fn find_by_user(&self, user_id: Uuid) -> DbResult<Option<MembershipRow>> {
        Ok(self.memberships.get(&user_id).map(|r| r.value().clone()))
    }

    async fn create(&self, user_id: Uuid, tier: &str) -> DbResult<()> {
        self.memberships
            .entry(user_id)
            .or_insert_with(|| MembershipRow {
                user_id,
                tier: tier.to_string(),
                pending_tier: None,
                change_effective_date: None,
                cycle_started_at: Utc::now(),
            });
        Ok(())
    }

    async fn set_tier(&self, user_id: Uuid, tier: &str) -> DbResult<()> {
        if let Some(mut row) = self.memberships.get_mut(&user_id) {
            row.tier = tier.to_string();
            row.pending_tier = None;
            row.change_effective_date = None;
        }
        Ok(())
    }

    async fn schedule_change(
        &self,
        user_id: Uuid,
        tier: &str,
        effective: DateTime<Utc>,
    ) -> DbResult<()> {
        if let Some(mut row) = self.memberships.get_mut(&user_id) {
            row.pending_tier = Some(tier.to_string());
            row.change_effective_date = Some(effective);
        }
        Ok(())
    }

    async fn record_payment(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        description: &str,
    ) -> DbResult<()> {
        self.payments.lock().await.push(PaymentRow {
            user_id,
            amount_cents,
            description: description.to_string(),
            paid_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_payments(&self, user_id: Uuid) -> DbResult<Vec<PaymentRow>> {
        let mut rows: Vec<_> = self
            .payments
            .lock()
            .await
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        Ok(rows)
    }
}

/// Mailer that records sends instead of delivering
#[derive(Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    send_count: AtomicUsize,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer whose every send fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn send_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }

    pub async fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, message: EmailMessage) -> Result<SentEmail, NotifyError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(NotifyError::ProviderError("mock failure".into()));
        }
        self.sent.lock().await.push(message);
        Ok(SentEmail {
            message_id: format!("mock-{}", self.send_count()),
        })
    }
}

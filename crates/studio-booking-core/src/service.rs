//! Booking orchestrator
//!
//! The only writer of the booking ledger and the capacity tracker. The
//! atomicity itself lives in the repository (one transaction per book or
//! cancel); this service owns the surrounding rules - membership allowance,
//! duplicate rejection surfacing, feed publication - and is the one place
//! the two are allowed to be touched together.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use studio_db::{
    AttendanceWrite, BookingRepository, BookingWrite, CancelWrite, ClassRepository,
    CreateBooking, MembershipRepository,
};
use studio_types::{
    Booking, BookingId, ClassAvailability, ClassId, GuestInfo, UserId, UserMembership,
};

use crate::availability::{AvailabilityFeed, LedgerChange, LedgerChangeKind};
use crate::catalog;
use crate::error::BookingError;

/// Booking orchestrator service
pub struct BookingService<C, B, M> {
    classes: Arc<C>,
    bookings: Arc<B>,
    memberships: Arc<M>,
    feed: AvailabilityFeed,
}

impl<C, B, M> BookingService<C, B, M>
where
    C: ClassRepository,
    B: BookingRepository,
    M: MembershipRepository,
{
    /// Create a new booking service
    pub fn new(classes: Arc<C>, bookings: Arc<B>, memberships: Arc<M>) -> Self {
        Self {
            classes,
            bookings,
            memberships,
            feed: AvailabilityFeed::new(),
        }
    }

    /// The availability feed this service publishes to
    pub fn feed(&self) -> &AvailabilityFeed {
        &self.feed
    }

    /// Seed the class catalog and publish the initial snapshot
    pub async fn seed_catalog(&self) -> Result<u64, BookingError> {
        let inserted = self.classes.seed(&catalog::seed_classes()).await?;
        if inserted > 0 {
            info!(inserted, "Seeded class catalog");
        }
        self.refresh_feed().await?;
        Ok(inserted)
    }

    /// Book a seat in a class for a user
    ///
    /// The capacity check-and-decrement and the ledger insert are one
    /// transaction in the repository; two concurrent calls for the last
    /// seat resolve to one success and one `ClassFull`.
    #[instrument(skip(self, guest), fields(user_id = %user_id, class_id = %class_id))]
    pub async fn book(
        &self,
        user_id: UserId,
        class_id: ClassId,
        guest: Option<GuestInfo>,
    ) -> Result<Booking, BookingError> {
        self.check_allowance(user_id).await?;

        let create = CreateBooking {
            id: BookingId::new().0,
            class_id: class_id.0,
            user_id: user_id.0,
            guest_name: guest.as_ref().map(|g| g.name.clone()),
            guest_phone: guest.as_ref().and_then(|g| g.phone.clone()),
        };

        let booking = match self.bookings.book(create).await? {
            BookingWrite::Created(row) => Booking::try_from(row)?,
            BookingWrite::ClassFull => return Err(BookingError::ClassFull),
            BookingWrite::ClassNotFound => return Err(BookingError::ClassNotFound),
            BookingWrite::AlreadyBooked => return Err(BookingError::AlreadyBooked),
        };

        metrics::counter!("studio_bookings_created_total").increment(1);
        info!(booking_id = %booking.id, "Booking confirmed");

        self.publish_change(LedgerChangeKind::Booked, &booking).await;

        Ok(booking)
    }

    /// Cancel a confirmed booking, restoring exactly one seat
    ///
    /// Cancelling an already-cancelled booking is rejected and never
    /// increments capacity a second time.
    #[instrument(skip(self), fields(booking_id = %booking_id))]
    pub async fn cancel(&self, booking_id: BookingId) -> Result<Booking, BookingError> {
        match self.bookings.cancel(booking_id.0).await? {
            CancelWrite::Cancelled => {}
            CancelWrite::BookingNotFound => return Err(BookingError::BookingNotFound),
            CancelWrite::AlreadyCancelled => return Err(BookingError::AlreadyCancelled),
            CancelWrite::ClassNotFound => {
                // Orphaned booking: catalog row is gone, booking deliberately
                // left untouched so the mismatch stays visible.
                warn!("Cancel hit a booking whose class no longer exists");
                return Err(BookingError::ClassNotFound);
            }
        }

        let booking = self
            .bookings
            .find_by_id(booking_id.0)
            .await?
            .ok_or(BookingError::BookingNotFound)
            .and_then(|row| Ok(Booking::try_from(row)?))?;

        metrics::counter!("studio_bookings_cancelled_total").increment(1);
        info!("Booking cancelled");

        self.publish_change(LedgerChangeKind::Cancelled, &booking)
            .await;

        Ok(booking)
    }

    /// Mark attendance on a non-cancelled booking
    ///
    /// Independent of the booking lifecycle; does not touch capacity.
    #[instrument(skip(self, notes), fields(booking_id = %booking_id))]
    pub async fn mark_attendance(
        &self,
        booking_id: BookingId,
        attended: bool,
        marked_by: UserId,
        notes: Option<String>,
    ) -> Result<Booking, BookingError> {
        match self
            .bookings
            .mark_attendance(booking_id.0, attended, marked_by.0, notes)
            .await?
        {
            AttendanceWrite::Marked => {}
            AttendanceWrite::BookingNotFound => return Err(BookingError::BookingNotFound),
            AttendanceWrite::BookingCancelled => return Err(BookingError::BookingCancelled),
        }

        let booking = self
            .bookings
            .find_by_id(booking_id.0)
            .await?
            .ok_or(BookingError::BookingNotFound)
            .and_then(|row| Ok(Booking::try_from(row)?))?;

        self.feed.announce(LedgerChange {
            kind: LedgerChangeKind::AttendanceMarked,
            booking_id: booking.id,
            class_id: booking.class_id,
            user_id: booking.user_id,
        });

        Ok(booking)
    }

    /// Availability for a single class
    pub async fn class_availability(
        &self,
        class_id: ClassId,
    ) -> Result<ClassAvailability, BookingError> {
        let row = self
            .classes
            .find_by_id(class_id.0)
            .await?
            .ok_or(BookingError::ClassNotFound)?;
        Ok(ClassAvailability::try_from(row)?)
    }

    /// The full catalog with live availability
    pub async fn availability(&self) -> Result<Vec<ClassAvailability>, BookingError> {
        let rows = self.classes.list().await?;
        let classes = rows
            .into_iter()
            .map(ClassAvailability::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(classes)
    }

    /// A user's confirmed bookings, newest first
    pub async fn user_bookings(&self, user_id: UserId) -> Result<Vec<Booking>, BookingError> {
        let rows = self.bookings.find_confirmed_by_user(user_id.0).await?;
        let bookings = rows
            .into_iter()
            .map(Booking::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bookings)
    }

    /// Re-materialize the availability snapshot and publish it
    pub async fn refresh_feed(&self) -> Result<(), BookingError> {
        let classes = self.availability().await?;
        self.feed.publish(classes);
        Ok(())
    }

    /// Reject the booking when the membership's monthly allowance is spent
    async fn check_allowance(&self, user_id: UserId) -> Result<(), BookingError> {
        let Some(membership) = self.memberships.find_by_user(user_id.0).await? else {
            // No membership on file: pay-per-class, no monthly cap to enforce
            return Ok(());
        };
        let membership = UserMembership::try_from(membership)?;

        let now = Utc::now();
        let Some(limit) = membership.effective_tier(now).class_limit() else {
            return Ok(());
        };

        let used = self
            .bookings
            .count_confirmed_since(user_id.0, membership.cycle_started_at)
            .await?;

        if used >= i64::from(limit) {
            return Err(BookingError::ClassLimitReached);
        }

        Ok(())
    }

    async fn publish_change(&self, kind: LedgerChangeKind, booking: &Booking) {
        self.feed.announce(LedgerChange {
            kind,
            booking_id: booking.id,
            class_id: booking.class_id,
            user_id: booking.user_id,
        });

        // Snapshot refresh failure only degrades the push view; the booking
        // itself already committed.
        if let Err(e) = self.refresh_feed().await {
            warn!(error = %e, "Failed to refresh availability feed");
        }
    }
}

//! Hall-hire scheduler
//!
//! A simpler, parallel booking system for the single shared hall, keyed by
//! date plus a `[start, end)` time range instead of fixed weekly slots.
//! Availability is overlap detection; submission re-validates inside the
//! same transaction as the insert, so the UI-check-then-submit race cannot
//! double-book a slot.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{error, info, instrument};

use studio_db::{CreateHallBooking, HallHireRepository, HallWrite};
use studio_notify::{templates, Mailer};
use studio_types::{HallBookingId, HallBookingStatus, HallHireBooking, HallPackage, PackagePricing};

use crate::catalog;
use crate::error::HallHireError;

/// Two half-open intervals `[s1, e1)` and `[s2, e2)` overlap iff
/// `s1 < e2 && s2 < e1`; touching endpoints do not conflict.
pub fn intervals_overlap(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    s1 < e2 && s2 < e1
}

/// Compute the total price in minor units for a package over a time range
///
/// Hourly packages charge per started hour; flat packages ignore duration.
pub fn quote_price(package: &HallPackage, start: NaiveTime, end: NaiveTime) -> i64 {
    match package.pricing {
        PackagePricing::Flat => package.price_cents,
        PackagePricing::Hourly => {
            let minutes = (end - start).num_minutes().max(0);
            let hours = minutes.div_euclid(60) + i64::from(minutes % 60 != 0);
            package.price_cents * hours
        }
    }
}

/// A hall-hire submission
#[derive(Debug, Clone)]
pub struct HallHireRequest {
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
}

/// Hall-hire scheduler service
pub struct HallHireService<H, N> {
    hall: Arc<H>,
    mailer: Arc<N>,
    admin_address: String,
}

impl<H, N> HallHireService<H, N>
where
    H: HallHireRepository,
    N: Mailer + 'static,
{
    /// Create a new hall-hire service
    pub fn new(hall: Arc<H>, mailer: Arc<N>, admin_address: String) -> Self {
        Self {
            hall,
            mailer,
            admin_address,
        }
    }

    /// The static package catalog
    pub fn packages(&self) -> &'static [HallPackage] {
        catalog::hall_packages()
    }

    /// Look up a package by ID
    pub fn package(&self, id: &str) -> Option<&'static HallPackage> {
        catalog::hall_packages().iter().find(|p| p.id == id)
    }

    /// Pure read-side availability check; reserves nothing
    pub async fn is_slot_available(
        &self,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<bool, HallHireError> {
        let existing = self.hall.find_active_on_date(date).await?;
        let free = !existing
            .iter()
            .any(|b| intervals_overlap(b.start_time, b.end_time, start, end));
        Ok(free)
    }

    /// Submit a hall-hire booking
    ///
    /// Availability is re-validated by the repository inside the insert
    /// transaction. On success the customer confirmation and admin alert go
    /// out fire-and-forget: a failed send is logged and never fails the
    /// booking.
    #[instrument(skip(self, request), fields(date = %request.event_date))]
    pub async fn submit(&self, request: HallHireRequest) -> Result<HallHireBooking, HallHireError> {
        if request.end_time <= request.start_time {
            return Err(HallHireError::InvalidTimeRange);
        }

        let package = self
            .package(&request.package_id)
            .ok_or_else(|| HallHireError::UnknownPackage(request.package_id.clone()))?;

        let total_price_cents = quote_price(package, request.start_time, request.end_time);

        let create = CreateHallBooking {
            id: HallBookingId::new().0,
            package_id: request.package_id,
            customer_name: request.customer_name,
            customer_email: request.customer_email,
            customer_phone: request.customer_phone,
            event_date: request.event_date,
            start_time: request.start_time,
            end_time: request.end_time,
            expected_attendees: request.expected_attendees,
            event_type: request.event_type,
            special_requirements: request.special_requirements,
            total_price_cents,
        };

        let booking = match self.hall.insert_if_free(create).await? {
            HallWrite::Created(row) => HallHireBooking::try_from(row)?,
            HallWrite::Conflict => return Err(HallHireError::SlotUnavailable),
        };

        metrics::counter!("studio_hall_bookings_created_total").increment(1);
        info!(booking_id = %booking.id, "Hall hire booking created");

        self.send_notifications(&booking);

        Ok(booking)
    }

    /// Look up a booking, failing if it does not exist
    pub async fn booking(&self, id: HallBookingId) -> Result<HallHireBooking, HallHireError> {
        let row = self
            .hall
            .find_by_id(id.0)
            .await?
            .ok_or(HallHireError::NotFound)?;
        Ok(HallHireBooking::try_from(row)?)
    }

    /// Confirm a pending booking
    #[instrument(skip(self), fields(id = %id))]
    pub async fn confirm(&self, id: HallBookingId) -> Result<HallHireBooking, HallHireError> {
        let mut booking = self.booking(id).await?;
        if booking.status != HallBookingStatus::Pending {
            return Err(HallHireError::NotPending);
        }

        self.hall
            .update_status(id.0, &HallBookingStatus::Confirmed.to_string())
            .await?;
        booking.status = HallBookingStatus::Confirmed;

        info!("Hall hire booking confirmed");
        Ok(booking)
    }

    /// Cancel a booking, freeing its slot for new submissions
    #[instrument(skip(self), fields(id = %id))]
    pub async fn cancel(&self, id: HallBookingId) -> Result<HallHireBooking, HallHireError> {
        let mut booking = self.booking(id).await?;
        if booking.status == HallBookingStatus::Cancelled {
            return Err(HallHireError::AlreadyCancelled);
        }

        self.hall
            .update_status(id.0, &HallBookingStatus::Cancelled.to_string())
            .await?;
        booking.status = HallBookingStatus::Cancelled;

        info!("Hall hire booking cancelled");
        Ok(booking)
    }

    fn send_notifications(&self, booking: &HallHireBooking) {
        let confirmation = templates::hall_hire_confirmation(booking);
        let alert = templates::hall_hire_admin_alert(booking, &self.admin_address);

        for message in [confirmation, alert] {
            let mailer = Arc::clone(&self.mailer);
            tokio::spawn(async move {
                let to = message.to.clone();
                if let Err(e) = mailer.send(message).await {
                    error!(to = %to, error = %e, "Hall hire notification failed");
                }
            });
        }
    }
}

//! Booking and scheduling errors
//!
//! State conflicts (class full, slot taken, not found) are typed variants
//! so the HTTP layer can surface them as `{success: false, message}` without
//! ever leaking an infrastructure error message to the user.

use thiserror::Error;

/// Booking orchestrator errors
#[derive(Error, Debug)]
pub enum BookingError {
    /// No seats left
    #[error("Class is full")]
    ClassFull,

    /// Class missing from the catalog
    #[error("Class not found")]
    ClassNotFound,

    /// Booking missing from the ledger
    #[error("Booking not found")]
    BookingNotFound,

    /// The booking was already cancelled; the seat is not restored twice
    #[error("Booking already cancelled")]
    AlreadyCancelled,

    /// The user already holds a confirmed booking for this class
    #[error("Already booked")]
    AlreadyBooked,

    /// The membership's monthly class allowance is used up
    #[error("Class limit reached")]
    ClassLimitReached,

    /// Attendance cannot be marked on a cancelled booking
    #[error("Booking is cancelled")]
    BookingCancelled,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] studio_db::DbError),
}

impl BookingError {
    /// Whether this is an expected state conflict rather than a failure of
    /// the backing store
    pub fn is_conflict(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

/// Hall-hire scheduler errors
#[derive(Error, Debug)]
pub enum HallHireError {
    /// Another non-cancelled booking overlaps the requested interval
    #[error("Time slot unavailable")]
    SlotUnavailable,

    /// Package ID not in the catalog
    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    /// End time not after start time
    #[error("Invalid time range")]
    InvalidTimeRange,

    /// No hall booking with that ID
    #[error("Hall booking not found")]
    NotFound,

    /// Only pending bookings can be confirmed
    #[error("Booking is not pending")]
    NotPending,

    /// The booking was already cancelled
    #[error("Booking already cancelled")]
    AlreadyCancelled,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] studio_db::DbError),
}

/// Membership management errors
#[derive(Error, Debug)]
pub enum MembershipError {
    /// No membership for this user
    #[error("Membership not found")]
    NotFound,

    /// Requested tier equals the current tier
    #[error("Already on this tier")]
    SameTier,

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] studio_db::DbError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_conflicts_are_not_store_failures() {
        assert!(BookingError::ClassFull.is_conflict());
        assert!(BookingError::AlreadyBooked.is_conflict());
        assert!(!BookingError::Database(studio_db::DbError::NotFound).is_conflict());
    }
}

//! Studio Booking Core - booking business logic
//!
//! The capacity-managed heart of the studio backend:
//! - [`BookingService`]: the booking orchestrator, sole writer of the
//!   booking ledger and the per-class seat counter
//! - [`AvailabilityFeed`]: push-based availability and booking views
//! - [`HallHireService`]: date/time-range hire of the hall with overlap
//!   conflict detection
//! - [`MembershipService`]: tier changes and class allowance
//!
//! Invariant maintained throughout: for every class,
//! `spots_left = capacity - count(confirmed bookings)`, and spots_left
//! never goes negative under concurrent bookings.

pub mod availability;
pub mod catalog;
pub mod error;
pub mod hall;
pub mod membership;
pub mod service;

pub use availability::{
    AvailabilityFeed, AvailabilitySnapshot, AvailabilitySubscription, LedgerChange,
    LedgerChangeKind,
};
pub use error::{BookingError, HallHireError, MembershipError};
pub use hall::{intervals_overlap, quote_price, HallHireRequest, HallHireService};
pub use membership::{MembershipService, TierChange, DOWNGRADE_DEFERRAL_DAYS};
pub use service::BookingService;

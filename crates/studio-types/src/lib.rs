//! Studio Types - Shared domain types
//!
//! This crate contains domain types used across the studio services:
//! - Identifiers for users, classes and bookings
//! - The class catalog and live availability
//! - Booking lifecycle and attendance
//! - Hall-hire bookings and packages
//! - Membership tiers and membership state

pub mod booking;
pub mod class;
pub mod hall;
pub mod ids;
pub mod membership;

pub use booking::*;
pub use class::*;
pub use hall::*;
pub use ids::*;
pub use membership::*;

//! REST API handlers

pub mod bookings;
pub mod classes;
pub mod email;
pub mod hall_hire;
pub mod health;
pub mod membership;
pub mod payments;

pub use bookings::*;
pub use classes::*;
pub use email::*;
pub use hall_hire::*;
pub use health::*;
pub use membership::*;
pub use payments::*;

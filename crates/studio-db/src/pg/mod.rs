//! PostgreSQL repository implementations

mod booking;
mod class;
mod hall_hire;
mod membership;

pub use booking::PgBookingRepository;
pub use class::PgClassRepository;
pub use hall_hire::PgHallHireRepository;
pub use membership::PgMembershipRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub classes: PgClassRepository,
    pub bookings: PgBookingRepository,
    pub hall_hire: PgHallHireRepository,
    pub memberships: PgMembershipRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            classes: PgClassRepository::new(pool.clone()),
            bookings: PgBookingRepository::new(pool.clone()),
            hall_hire: PgHallHireRepository::new(pool.clone()),
            memberships: PgMembershipRepository::new(pool),
        }
    }
}

//! Application state for the studio API service.

use std::sync::Arc;

use studio_billing_core::StripeProvider;
use studio_booking_core::{BookingService, HallHireService, MembershipService};
use studio_db::pg::{
    PgBookingRepository, PgClassRepository, PgHallHireRepository, PgMembershipRepository,
    Repositories,
};
use studio_db::DbPool;
use studio_notify::HttpMailer;

use crate::config::Config;

/// The concrete booking orchestrator behind the HTTP handlers
pub type Bookings = BookingService<PgClassRepository, PgBookingRepository, PgMembershipRepository>;
/// The concrete hall-hire scheduler
pub type HallHire = HallHireService<PgHallHireRepository, HttpMailer>;
/// The concrete membership manager
pub type Memberships = MembershipService<PgMembershipRepository, PgBookingRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Class booking orchestrator
    pub bookings: Arc<Bookings>,
    /// Hall-hire scheduler
    pub hall: Arc<HallHire>,
    /// Membership manager
    pub memberships: Arc<Memberships>,
    /// Payment provider
    pub payments: Arc<StripeProvider>,
    /// Outbound email
    pub mailer: Arc<HttpMailer>,
    /// Database pool (readiness checks)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(repos: Repositories, pool: DbPool, config: Config) -> Self {
        let mailer = Arc::new(HttpMailer::new(config.mailer.clone()));

        let bookings = BookingService::new(
            Arc::new(repos.classes.clone()),
            Arc::new(repos.bookings.clone()),
            Arc::new(repos.memberships.clone()),
        );
        let hall = HallHireService::new(
            Arc::new(repos.hall_hire),
            Arc::clone(&mailer),
            config.mailer.admin_address.clone(),
        );
        let memberships =
            MembershipService::new(Arc::new(repos.memberships), Arc::new(repos.bookings));

        Self {
            bookings: Arc::new(bookings),
            hall: Arc::new(hall),
            memberships: Arc::new(memberships),
            payments: Arc::new(StripeProvider::new(config.billing.clone())),
            mailer,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

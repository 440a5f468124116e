//! Studio DB - PostgreSQL persistence
//!
//! Row models, repository traits, and PostgreSQL implementations. All
//! capacity-affecting writes (class book/cancel, hall-hire submission) run
//! inside explicit transactions so that concurrent requests can never
//! overbook a class or double-book the hall.

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::{BookingRow, ClassRow, HallHireRow, MembershipRow, PaymentRow};
pub use pool::{create_pool, DbPool};
pub use repo::{
    AttendanceWrite, BookingRepository, BookingWrite, CancelWrite, ClassRepository,
    CreateBooking, CreateHallBooking, HallHireRepository, HallWrite, MembershipRepository,
    SeedClass,
};

//! PostgreSQL booking ledger repository implementation
//!
//! `book` and `cancel` are the only code paths in the workspace that write
//! `classes.spots_left`. Each pairs the capacity write with the ledger write
//! in one transaction; a failure partway rolls back both. The capacity check
//! is a conditional `UPDATE ... WHERE spots_left > 0`, which re-reads the
//! latest committed value under the row lock, so two concurrent bookings of
//! the last seat cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::BookingRow;
use crate::repo::{
    AttendanceWrite, BookingRepository, BookingWrite, CancelWrite, CreateBooking,
};

const BOOKING_COLUMNS: &str = "id, class_id, user_id, status, booked_at, attended, \
                               marked_by, marked_at, notes, guest_name, guest_phone";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.kind() == sqlx::error::ErrorKind::UniqueViolation
    )
}

/// PostgreSQL booking ledger repository
#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn book(&self, create: CreateBooking) -> DbResult<BookingWrite> {
        let mut tx = self.pool.begin().await?;

        // Duplicate confirmed bookings for (user, class) are rejected here,
        // not left to the UI.
        let already_booked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE user_id = $1 AND class_id = $2 AND status = 'confirmed'
            )
            "#,
        )
        .bind(create.user_id)
        .bind(create.class_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_booked {
            return Ok(BookingWrite::AlreadyBooked);
        }

        // Conditional check-and-decrement. Zero rows affected means either
        // a full class or a missing class; nothing was written either way.
        let decremented = sqlx::query(
            "UPDATE classes SET spots_left = spots_left - 1 WHERE id = $1 AND spots_left > 0",
        )
        .bind(create.class_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            let exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM classes WHERE id = $1)")
                    .bind(create.class_id)
                    .fetch_one(&mut *tx)
                    .await?;

            return Ok(if exists {
                BookingWrite::ClassFull
            } else {
                BookingWrite::ClassNotFound
            });
        }

        // Two same-user bookings racing past the pre-check both reach this
        // INSERT; the partial unique index on (user_id, class_id) aborts the
        // loser, which rolls back its decrement and reports AlreadyBooked.
        let inserted = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (id, class_id, user_id, status, booked_at, guest_name, guest_phone)
            VALUES ($1, $2, $3, 'confirmed', NOW(), $4, $5)
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(create.id)
        .bind(create.class_id)
        .bind(create.user_id)
        .bind(&create.guest_name)
        .bind(&create.guest_phone)
        .fetch_one(&mut *tx)
        .await;

        let row = match inserted {
            Ok(row) => row,
            Err(e) if is_unique_violation(&e) => return Ok(BookingWrite::AlreadyBooked),
            Err(e) => return Err(e.into()),
        };

        tx.commit().await?;

        debug!(booking_id = %row.id, class_id = %row.class_id, "Booking row inserted");
        Ok(BookingWrite::Created(row))
    }

    async fn cancel(&self, booking_id: Uuid) -> DbResult<CancelWrite> {
        let mut tx = self.pool.begin().await?;

        // Lock the booking row so a concurrent cancel of the same booking
        // serializes here; the status predicate below then rejects it.
        let booking = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE",
        ))
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booking) = booking else {
            return Ok(CancelWrite::BookingNotFound);
        };

        if booking.status != "confirmed" {
            return Ok(CancelWrite::AlreadyCancelled);
        }

        // Restore exactly one seat, clamped at capacity. A missing class row
        // aborts the transaction and leaves the booking untouched.
        let restored = sqlx::query(
            "UPDATE classes SET spots_left = LEAST(spots_left + 1, capacity) WHERE id = $1",
        )
        .bind(booking.class_id)
        .execute(&mut *tx)
        .await?;

        if restored.rows_affected() == 0 {
            return Ok(CancelWrite::ClassNotFound);
        }

        sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE id = $1 AND status = 'confirmed'")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(booking_id = %booking_id, "Booking row cancelled");
        Ok(CancelWrite::Cancelled)
    }

    async fn find_by_id(&self, booking_id: Uuid) -> DbResult<Option<BookingRow>> {
        let booking = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1",
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn find_confirmed_by_user(&self, user_id: Uuid) -> DbResult<Vec<BookingRow>> {
        let bookings = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE user_id = $1 AND status = 'confirmed'
            ORDER BY booked_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn count_confirmed_since(&self, user_id: Uuid, since: DateTime<Utc>) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE user_id = $1 AND status = 'confirmed' AND booked_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_confirmed_for_class(&self, class_id: Uuid) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE class_id = $1 AND status = 'confirmed'",
        )
        .bind(class_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_attendance(
        &self,
        booking_id: Uuid,
        attended: bool,
        marked_by: Uuid,
        notes: Option<String>,
    ) -> DbResult<AttendanceWrite> {
        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET attended = $2, marked_by = $3, marked_at = NOW(), notes = $4
            WHERE id = $1 AND status <> 'cancelled'
            "#,
        )
        .bind(booking_id)
        .bind(attended)
        .bind(marked_by)
        .bind(&notes)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() > 0 {
            return Ok(AttendanceWrite::Marked);
        }

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM bookings WHERE id = $1)")
                .bind(booking_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(if exists {
            AttendanceWrite::BookingCancelled
        } else {
            AttendanceWrite::BookingNotFound
        })
    }
}

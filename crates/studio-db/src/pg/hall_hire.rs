//! PostgreSQL hall-hire repository implementation
//!
//! The overlap re-check and the insert run inside one SERIALIZABLE
//! transaction, so two simultaneous submissions for overlapping slots
//! cannot both commit: one of them either sees the other's row or fails
//! with a serialization error and is surfaced to the caller.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::HallHireRow;
use crate::repo::{CreateHallBooking, HallHireRepository, HallWrite};

const HALL_COLUMNS: &str = "id, package_id, customer_name, customer_email, customer_phone, \
                            event_date, start_time, end_time, expected_attendees, event_type, \
                            special_requirements, total_price_cents, status, created_at";

/// PostgreSQL hall-hire repository
#[derive(Clone)]
pub struct PgHallHireRepository {
    pool: PgPool,
}

impl PgHallHireRepository {
    /// Create a new hall-hire repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> DbResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl HallHireRepository for PgHallHireRepository {
    async fn find_active_on_date(&self, date: NaiveDate) -> DbResult<Vec<HallHireRow>> {
        let bookings = sqlx::query_as::<_, HallHireRow>(&format!(
            r#"
            SELECT {HALL_COLUMNS}
            FROM hall_hire_bookings
            WHERE event_date = $1 AND status <> 'cancelled'
            ORDER BY start_time
            "#,
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn insert_if_free(&self, create: CreateHallBooking) -> DbResult<HallWrite> {
        let mut tx = self.pool.begin().await?;
        self.set_transaction_serializable(&mut tx).await?;

        // Two half-open intervals [s1,e1) and [s2,e2) overlap iff
        // s1 < e2 AND s2 < e1; touching endpoints do not conflict.
        let overlap = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM hall_hire_bookings
                WHERE event_date = $1
                  AND status <> 'cancelled'
                  AND start_time < $3
                  AND $2 < end_time
            )
            "#,
        )
        .bind(create.event_date)
        .bind(create.start_time)
        .bind(create.end_time)
        .fetch_one(&mut *tx)
        .await?;

        if overlap {
            return Ok(HallWrite::Conflict);
        }

        let row = sqlx::query_as::<_, HallHireRow>(&format!(
            r#"
            INSERT INTO hall_hire_bookings
                (id, package_id, customer_name, customer_email, customer_phone,
                 event_date, start_time, end_time, expected_attendees, event_type,
                 special_requirements, total_price_cents, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'pending', NOW())
            RETURNING {HALL_COLUMNS}
            "#,
        ))
        .bind(create.id)
        .bind(&create.package_id)
        .bind(&create.customer_name)
        .bind(&create.customer_email)
        .bind(&create.customer_phone)
        .bind(create.event_date)
        .bind(create.start_time)
        .bind(create.end_time)
        .bind(create.expected_attendees)
        .bind(&create.event_type)
        .bind(&create.special_requirements)
        .bind(create.total_price_cents)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(id = %row.id, date = %row.event_date, "Hall hire row inserted");
        Ok(HallWrite::Created(row))
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<HallHireRow>> {
        let booking = sqlx::query_as::<_, HallHireRow>(&format!(
            "SELECT {HALL_COLUMNS} FROM hall_hire_bookings WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> DbResult<()> {
        sqlx::query("UPDATE hall_hire_bookings SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, status, "Hall hire status updated");
        Ok(())
    }
}

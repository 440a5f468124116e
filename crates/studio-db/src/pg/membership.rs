//! PostgreSQL membership repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::{MembershipRow, PaymentRow};
use crate::repo::MembershipRepository;

const MEMBERSHIP_COLUMNS: &str =
    "user_id, tier, pending_tier, change_effective_date, cycle_started_at";

/// PostgreSQL membership repository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new membership repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn find_by_user(&self, user_id: Uuid) -> DbResult<Option<MembershipRow>> {
        let membership = sqlx::query_as::<_, MembershipRow>(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM memberships WHERE user_id = $1",
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn create(&self, user_id: Uuid, tier: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO memberships (user_id, tier, cycle_started_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(tier)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_tier(&self, user_id: Uuid, tier: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE memberships
            SET tier = $2, pending_tier = NULL, change_effective_date = NULL
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(tier)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn schedule_change(
        &self,
        user_id: Uuid,
        tier: &str,
        effective: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE memberships
            SET pending_tier = $2, change_effective_date = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(tier)
        .bind(effective)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_payment(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        description: &str,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO membership_payments (user_id, amount_cents, description, paid_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(user_id)
        .bind(amount_cents)
        .bind(description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_payments(&self, user_id: Uuid) -> DbResult<Vec<PaymentRow>> {
        let payments = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT user_id, amount_cents, description, paid_at
            FROM membership_payments
            WHERE user_id = $1
            ORDER BY paid_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}

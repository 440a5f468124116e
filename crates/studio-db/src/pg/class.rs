//! PostgreSQL class catalog repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::ClassRow;
use crate::repo::{ClassRepository, SeedClass};

/// PostgreSQL class catalog repository
#[derive(Clone)]
pub struct PgClassRepository {
    pool: PgPool,
}

impl PgClassRepository {
    /// Create a new class repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClassRepository for PgClassRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<ClassRow>> {
        let class = sqlx::query_as::<_, ClassRow>(
            r#"
            SELECT id, name, category, day, start_time, duration_minutes,
                   instructor, capacity, spots_left
            FROM classes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(class)
    }

    async fn list(&self) -> DbResult<Vec<ClassRow>> {
        let classes = sqlx::query_as::<_, ClassRow>(
            r#"
            SELECT id, name, category, day, start_time, duration_minutes,
                   instructor, capacity, spots_left
            FROM classes
            ORDER BY day, start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(classes)
    }

    async fn seed(&self, classes: &[SeedClass]) -> DbResult<u64> {
        let mut inserted = 0;
        for class in classes {
            // New offerings start with a full house: spots_left = capacity
            let res = sqlx::query(
                r#"
                INSERT INTO classes (id, name, category, day, start_time,
                                     duration_minutes, instructor, capacity, spots_left)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(class.id)
            .bind(&class.name)
            .bind(&class.category)
            .bind(&class.day)
            .bind(class.start_time)
            .bind(class.duration_minutes)
            .bind(&class.instructor)
            .bind(class.capacity)
            .execute(&self.pool)
            .await?;

            inserted += res.rows_affected();
        }

        if inserted > 0 {
            debug!(inserted, "Class catalog seeded");
        }
        Ok(inserted)
    }
}

use interactions_shared::types::{CountsDelta, TargetCounters, TargetId, TargetKind};
use sqlx::{FromRow, PgPool};

use crate::errors::RepositoryError;
use crate::interfaces::CounterRepository;

/// PostgreSQL implementation of the target counter store.
pub struct PostgresCounterRepository {
    pool: PgPool,
}

#[derive(FromRow)]
struct CountsRow {
    like_count: i64,
    dislike_count: i64,
}

impl CountsRow {
    fn into_counters(self, target: &TargetId, kind: TargetKind) -> TargetCounters {
        TargetCounters {
            target_id: target.clone(),
            target_kind: kind,
            like_count: self.like_count,
            dislike_count: self.dislike_count,
        }
    }
}

impl PostgresCounterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CounterRepository for PostgresCounterRepository {
    async fn get_counts(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<TargetCounters, RepositoryError> {
        let row = sqlx::query_as::<_, CountsRow>(
            r#"
            SELECT like_count, dislike_count
            FROM target_counters
            WHERE target_id = $1 AND target_kind = $2
            "#,
        )
        .bind(target.as_str())
        .bind(kind.as_i16())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(|row| row.into_counters(target, kind))
            .unwrap_or_else(|| TargetCounters::zero(target.clone(), kind)))
    }

    async fn set_counts(&self, counters: &TargetCounters) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO target_counters (target_id, target_kind, like_count, dislike_count)
            VALUES ($1, $2, GREATEST($3, 0), GREATEST($4, 0))
            ON CONFLICT (target_id, target_kind)
            DO UPDATE SET
                like_count = EXCLUDED.like_count,
                dislike_count = EXCLUDED.dislike_count
            "#,
        )
        .bind(counters.target_id.as_str())
        .bind(counters.target_kind.as_i16())
        .bind(counters.like_count)
        .bind(counters.dislike_count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn increment(
        &self,
        target: &TargetId,
        kind: TargetKind,
        delta: CountsDelta,
    ) -> Result<TargetCounters, RepositoryError> {
        let row = sqlx::query_as::<_, CountsRow>(
            r#"
            INSERT INTO target_counters (target_id, target_kind, like_count, dislike_count)
            VALUES ($1, $2, GREATEST($3, 0), GREATEST($4, 0))
            ON CONFLICT (target_id, target_kind)
            DO UPDATE SET
                like_count = GREATEST(target_counters.like_count + $3, 0),
                dislike_count = GREATEST(target_counters.dislike_count + $4, 0)
            RETURNING like_count, dislike_count
            "#,
        )
        .bind(target.as_str())
        .bind(kind.as_i16())
        .bind(delta.likes)
        .bind(delta.dislikes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_counters(target, kind))
    }

    async fn compare_and_set(
        &self,
        expected: &TargetCounters,
        new: &TargetCounters,
    ) -> Result<bool, RepositoryError> {
        let updated = sqlx::query(
            r#"
            UPDATE target_counters
            SET like_count = GREATEST($5, 0), dislike_count = GREATEST($6, 0)
            WHERE target_id = $1 AND target_kind = $2
              AND like_count = $3 AND dislike_count = $4
            "#,
        )
        .bind(expected.target_id.as_str())
        .bind(expected.target_kind.as_i16())
        .bind(expected.like_count)
        .bind(expected.dislike_count)
        .bind(new.like_count)
        .bind(new.dislike_count)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated > 0 {
            return Ok(true);
        }
        if expected.like_count != 0 || expected.dislike_count != 0 {
            return Ok(false);
        }

        // A missing row reads as zero; the first writer creates it.
        let inserted = sqlx::query(
            r#"
            INSERT INTO target_counters (target_id, target_kind, like_count, dislike_count)
            VALUES ($1, $2, GREATEST($3, 0), GREATEST($4, 0))
            ON CONFLICT (target_id, target_kind) DO NOTHING
            "#,
        )
        .bind(expected.target_id.as_str())
        .bind(expected.target_kind.as_i16())
        .bind(new.like_count)
        .bind(new.dislike_count)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted > 0)
    }

    async fn recount(
        &self,
        target: &TargetId,
        kind: TargetKind,
    ) -> Result<TargetCounters, RepositoryError> {
        let row = sqlx::query_as::<_, CountsRow>(
            r#"
            INSERT INTO target_counters (target_id, target_kind, like_count, dislike_count)
            SELECT $1, $2,
                   COUNT(*) FILTER (WHERE liked),
                   COUNT(*) FILTER (WHERE disliked)
            FROM vote_records
            WHERE target_id = $1 AND target_kind = $2
            ON CONFLICT (target_id, target_kind)
            DO UPDATE SET
                like_count = EXCLUDED.like_count,
                dislike_count = EXCLUDED.dislike_count
            RETURNING like_count, dislike_count
            "#,
        )
        .bind(target.as_str())
        .bind(kind.as_i16())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_counters(target, kind))
    }
}

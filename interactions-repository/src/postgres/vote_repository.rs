use chrono::{DateTime, Utc};
use interactions_shared::types::{ActorId, TargetId, TargetKind, VoteFlags, VoteRecord};
use sqlx::{FromRow, PgPool};

use crate::errors::RepositoryError;
use crate::interfaces::VoteRepository;

/// PostgreSQL implementation of the vote record store.
///
/// The `vote_records` table carries a `CHECK (NOT (liked AND disliked))`
/// constraint, so an invalid pair is rejected by the database as well.
pub struct PostgresVoteRepository {
    pool: PgPool,
}

#[derive(FromRow)]
struct VoteRow {
    actor_id: String,
    target_id: String,
    target_kind: i16,
    liked: bool,
    disliked: bool,
    last_updated: DateTime<Utc>,
}

impl TryFrom<VoteRow> for VoteRecord {
    type Error = RepositoryError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(VoteRecord {
            actor_id: ActorId::new(row.actor_id)?,
            target_id: TargetId::new(row.target_id)?,
            target_kind: TargetKind::try_from(row.target_kind)?,
            flags: VoteFlags::new(row.liked, row.disliked)?,
            last_updated: row.last_updated,
        })
    }
}

impl PostgresVoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Explains why an upsert returned no row: either a record of another
    /// kind already holds the id, or the actor has no profile.
    async fn refusal(&self, actor: &ActorId, target: &TargetId, kind: TargetKind) -> RepositoryError {
        let stored = sqlx::query_scalar::<_, i16>(
            "SELECT target_kind FROM vote_records WHERE actor_id = $1 AND target_id = $2",
        )
        .bind(actor.as_str())
        .bind(target.as_str())
        .fetch_optional(&self.pool)
        .await;

        match stored {
            Ok(Some(stored)) => match TargetKind::try_from(stored) {
                Ok(stored) => RepositoryError::KindMismatch {
                    target: target.to_string(),
                    stored,
                    requested: kind,
                },
                Err(e) => e.into(),
            },
            Ok(None) => RepositoryError::NotEligible(actor.to_string()),
            Err(e) => e.into(),
        }
    }
}

#[async_trait::async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn get_vote(
        &self,
        actor: &ActorId,
        target: &TargetId,
    ) -> Result<Option<VoteRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT actor_id, target_id, target_kind, liked, disliked, last_updated
            FROM vote_records
            WHERE actor_id = $1 AND target_id = $2
            "#,
        )
        .bind(actor.as_str())
        .bind(target.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(VoteRecord::try_from).transpose()
    }

    /// Upserts the record, refusing actors without a profile and records
    /// whose stored kind differs from `kind`.
    ///
    /// The eligibility check and the write happen in a single statement: the
    /// row is only inserted when a matching `profiles` row exists and only
    /// updated when the kind matches. An empty result is explained by a
    /// follow-up read of the stored kind.
    async fn set_vote(
        &self,
        actor: &ActorId,
        target: &TargetId,
        kind: TargetKind,
        flags: VoteFlags,
    ) -> Result<VoteRecord, RepositoryError> {
        let row = sqlx::query_as::<_, VoteRow>(
            r#"
            INSERT INTO vote_records (actor_id, target_id, target_kind, liked, disliked, last_updated)
            SELECT $1, $2, $3, $4, $5, NOW()
            WHERE EXISTS (SELECT 1 FROM profiles WHERE actor_id = $1)
            ON CONFLICT (actor_id, target_id)
            DO UPDATE SET
                target_kind = EXCLUDED.target_kind,
                liked = EXCLUDED.liked,
                disliked = EXCLUDED.disliked,
                last_updated = EXCLUDED.last_updated
            WHERE vote_records.target_kind = EXCLUDED.target_kind
            RETURNING actor_id, target_id, target_kind, liked, disliked, last_updated
            "#,
        )
        .bind(actor.as_str())
        .bind(target.as_str())
        .bind(kind.as_i16())
        .bind(flags.liked())
        .bind(flags.disliked())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => VoteRecord::try_from(row),
            None => Err(self.refusal(actor, target, kind).await),
        }
    }
}

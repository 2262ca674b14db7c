use interactions_shared::types::ActorId;
use sqlx::PgPool;

use crate::errors::RepositoryError;
use crate::interfaces::ProfileDirectory;

/// Looks up actor profiles in the `profiles` table.
pub struct PostgresProfileDirectory {
    pool: PgPool,
}

impl PostgresProfileDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileDirectory for PostgresProfileDirectory {
    async fn has_profile(&self, actor: &ActorId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM profiles WHERE actor_id = $1)",
        )
        .bind(actor.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_profile(&self, actor: &ActorId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO profiles (actor_id) VALUES ($1) ON CONFLICT (actor_id) DO NOTHING")
            .bind(actor.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

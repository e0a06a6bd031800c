use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::error::Result;
use crate::models::CachedLeaderboard;

/// Repository for the advisory leaderboard cache. Display layers read it;
/// the engine only ever writes.
pub struct LeaderboardCacheRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeaderboardCacheRepository<'a> {
    /// Create a new LeaderboardCacheRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Save a computed leaderboard, replacing any older computation
    pub async fn save(
        &self,
        competition_id: Uuid,
        computed_at: DateTime<Utc>,
        entries: &serde_json::Value,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO leaderboard_cache (competition_id, computed_at, entries) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (competition_id) DO UPDATE SET computed_at = $2, entries = $3",
        )
        .bind(competition_id)
        .bind(computed_at)
        .bind(Json(entries))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Load the cached leaderboard for a competition, if any
    pub async fn load(&self, competition_id: Uuid) -> Result<Option<CachedLeaderboard>> {
        let cached = sqlx::query_as::<_, CachedLeaderboard>(
            "SELECT competition_id, computed_at, entries \
             FROM leaderboard_cache \
             WHERE competition_id = $1",
        )
        .bind(competition_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cached)
    }
}

use sqlx::PgPool;

use crate::error::Result;
use crate::models::Season;

/// Repository for Season database operations
pub struct SeasonRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SeasonRepository<'a> {
    /// Create a new SeasonRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a season by key
    pub async fn find(&self, season_key: &str) -> Result<Option<Season>> {
        let season = sqlx::query_as::<_, Season>(
            "SELECT season_key, start_at, end_at FROM seasons WHERE season_key = $1",
        )
        .bind(season_key)
        .fetch_optional(self.pool)
        .await?;

        Ok(season)
    }

    /// Create or update a season's window
    pub async fn upsert(&self, season: &Season) -> Result<()> {
        sqlx::query(
            "INSERT INTO seasons (season_key, start_at, end_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (season_key) DO UPDATE SET start_at = $2, end_at = $3",
        )
        .bind(&season.season_key)
        .bind(season.start_at)
        .bind(season.end_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

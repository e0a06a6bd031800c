use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::dto::competition::CreateCompetitionRequest;
use crate::error::{Result, StorageError};
use crate::models::Competition;

const COMPETITION_COLUMNS: &str = "competition_id, guild_id, owner_id, title, description, \
     visibility, capacity, start_at, end_at, season_key, is_cancelled, criteria, \
     created_at, updated_at";

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        let sql = format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions WHERE competition_id = $1"
        );
        let competition = sqlx::query_as::<_, Competition>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// List competitions for one server, newest first
    pub async fn list_by_guild(&self, guild_id: &str) -> Result<Vec<Competition>> {
        let sql = format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions \
             WHERE guild_id = $1 ORDER BY created_at DESC"
        );
        let competitions = sqlx::query_as::<_, Competition>(&sql)
            .bind(guild_id)
            .fetch_all(self.pool)
            .await?;

        Ok(competitions)
    }

    /// List competitions the daily update cycle should still look at: not
    /// cancelled, with a window (fixed or resolved through `seasons`) that
    /// has not ended before the cutoff. A season-dated competition whose
    /// season key resolves to nothing stays in the list so its broken
    /// window keeps showing up in the cycle logs.
    pub async fn list_current(&self, cutoff: DateTime<Utc>) -> Result<Vec<Competition>> {
        let sql = format!(
            "SELECT {COMPETITION_COLUMNS} FROM competitions \
             WHERE NOT is_cancelled AND ( \
                 end_at >= $1 \
                 OR (end_at IS NULL AND NOT EXISTS ( \
                     SELECT 1 FROM seasons s \
                     WHERE s.season_key = competitions.season_key AND s.end_at < $1 \
                 )) \
             ) \
             ORDER BY created_at"
        );
        let competitions = sqlx::query_as::<_, Competition>(&sql)
            .bind(cutoff)
            .fetch_all(self.pool)
            .await?;

        Ok(competitions)
    }

    /// Create a new competition
    pub async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let sql = format!(
            "INSERT INTO competitions (guild_id, owner_id, title, description, visibility, \
                 capacity, start_at, end_at, season_key, criteria) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COMPETITION_COLUMNS}"
        );
        let competition = sqlx::query_as::<_, Competition>(&sql)
            .bind(&req.guild_id)
            .bind(&req.owner_id)
            .bind(&req.title)
            .bind(&req.description)
            .bind(&req.visibility)
            .bind(req.capacity)
            .bind(req.start_at)
            .bind(req.end_at)
            .bind(&req.season_key)
            .bind(Json(&req.criteria))
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                StorageError::on_check_violation(
                    e,
                    "Date specification must be fixed dates or a season",
                )
            })?;

        Ok(competition)
    }

    /// Set the one-way cancellation flag
    pub async fn cancel(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE competitions SET is_cancelled = TRUE, updated_at = NOW() \
             WHERE competition_id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

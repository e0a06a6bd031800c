use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::MatchRecord;

/// Repository for the bulk match-record store. Ingestion is idempotent on
/// (match_id, puuid) so re-running an import never duplicates activity.
pub struct MatchRecordRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MatchRecordRepository<'a> {
    /// Create a new MatchRecordRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store one match record; replays of the same match for the same
    /// account are skipped
    pub async fn record(&self, record: &MatchRecord) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO match_records (match_id, puuid, queue_id, win, champion_id, played_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (match_id, puuid) DO NOTHING",
        )
        .bind(&record.match_id)
        .bind(&record.puuid)
        .bind(record.queue_id)
        .bind(record.win)
        .bind(record.champion_id)
        .bind(record.played_at)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// One bulk query for all of a competition's linked accounts over a
    /// date window
    pub async fn query_activity(
        &self,
        puuids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<MatchRecord>> {
        if puuids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<_, MatchRecord>(
            "SELECT match_id, puuid, queue_id, win, champion_id, played_at \
             FROM match_records \
             WHERE puuid = ANY($1) AND played_at >= $2 AND played_at <= $3 \
             ORDER BY played_at",
        )
        .bind(puuids)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }
}

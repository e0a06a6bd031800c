use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{RankSnapshot, RankValue, RankedQueue, SnapshotKind};

/// Repository for RankSnapshot database operations. Snapshots are
/// insert-only: the composite primary key plus `ON CONFLICT DO NOTHING`
/// gives the atomic check-then-create the engine relies on.
pub struct SnapshotRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SnapshotRepository<'a> {
    /// Create a new SnapshotRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a snapshot unless one already exists for the key. Returns
    /// whether a row was written; `false` means the key was already taken
    /// and the stored measurement is untouched.
    pub async fn create_if_absent(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
        queue: RankedQueue,
        value: RankValue,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO rank_snapshots \
                 (competition_id, participant_id, kind, queue, tier, division, league_points) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (competition_id, participant_id, kind) DO NOTHING",
        )
        .bind(competition_id)
        .bind(participant_id)
        .bind(kind.as_str())
        .bind(queue.as_str())
        .bind(value.tier.as_str())
        .bind(value.division.as_str())
        .bind(value.league_points)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Read one snapshot by key
    pub async fn find(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
    ) -> Result<Option<RankSnapshot>> {
        let snapshot = sqlx::query_as::<_, RankSnapshot>(
            "SELECT competition_id, participant_id, kind, queue, tier, division, \
                    league_points, captured_at \
             FROM rank_snapshots \
             WHERE competition_id = $1 AND participant_id = $2 AND kind = $3",
        )
        .bind(competition_id)
        .bind(participant_id)
        .bind(kind.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(snapshot)
    }

    /// All snapshots of one kind for a competition
    pub async fn list_for_competition(
        &self,
        competition_id: Uuid,
        kind: SnapshotKind,
    ) -> Result<Vec<RankSnapshot>> {
        let snapshots = sqlx::query_as::<_, RankSnapshot>(
            "SELECT competition_id, participant_id, kind, queue, tier, division, \
                    league_points, captured_at \
             FROM rank_snapshots \
             WHERE competition_id = $1 AND kind = $2 \
             ORDER BY participant_id",
        )
        .bind(competition_id)
        .bind(kind.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(snapshots)
    }
}

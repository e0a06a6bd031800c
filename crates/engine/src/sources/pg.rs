use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::models::{
    Competition, MatchRecord, RankSnapshot, RankValue, RankedQueue, RosterMember, Season,
    SnapshotKind,
};
use storage::repository::{
    CompetitionRepository, LeaderboardCacheRepository, MatchRecordRepository,
    ParticipantRepository, SeasonRepository, SnapshotRepository,
};
use uuid::Uuid;

use crate::sources::{
    ActivitySource, CompetitionSource, LeaderboardCache, ParticipantSource, SeasonSource,
    SnapshotStore, SourceResult,
};

/// Postgres-backed implementation of the store/source seams, delegating to
/// the storage repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for PgStore {
    async fn find(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<Option<RankSnapshot>> {
        let repo = SnapshotRepository::new(&self.pool);
        Ok(repo.find(competition_id, participant_id, kind).await?)
    }

    async fn create_if_absent(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
        queue: RankedQueue,
        value: RankValue,
    ) -> SourceResult<bool> {
        let repo = SnapshotRepository::new(&self.pool);
        Ok(repo
            .create_if_absent(competition_id, participant_id, kind, queue, value)
            .await?)
    }

    async fn list(
        &self,
        competition_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<Vec<RankSnapshot>> {
        let repo = SnapshotRepository::new(&self.pool);
        Ok(repo.list_for_competition(competition_id, kind).await?)
    }
}

#[async_trait]
impl ActivitySource for PgStore {
    async fn query_activity(
        &self,
        puuids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SourceResult<Vec<MatchRecord>> {
        let repo = MatchRecordRepository::new(&self.pool);
        Ok(repo.query_activity(puuids, from, to).await?)
    }
}

#[async_trait]
impl ParticipantSource for PgStore {
    async fn joined_roster(&self, competition_id: Uuid) -> SourceResult<Vec<RosterMember>> {
        let repo = ParticipantRepository::new(&self.pool);
        Ok(repo.joined_roster(competition_id).await?)
    }
}

#[async_trait]
impl SeasonSource for PgStore {
    async fn find(&self, season_key: &str) -> SourceResult<Option<Season>> {
        let repo = SeasonRepository::new(&self.pool);
        Ok(repo.find(season_key).await?)
    }
}

#[async_trait]
impl CompetitionSource for PgStore {
    async fn list_current(&self, cutoff: DateTime<Utc>) -> SourceResult<Vec<Competition>> {
        let repo = CompetitionRepository::new(&self.pool);
        Ok(repo.list_current(cutoff).await?)
    }
}

#[async_trait]
impl LeaderboardCache for PgStore {
    async fn save(
        &self,
        competition_id: Uuid,
        computed_at: DateTime<Utc>,
        entries: &serde_json::Value,
    ) -> SourceResult<()> {
        let repo = LeaderboardCacheRepository::new(&self.pool);
        Ok(repo.save(competition_id, computed_at, entries).await?)
    }

    async fn load(
        &self,
        competition_id: Uuid,
    ) -> SourceResult<Option<(DateTime<Utc>, serde_json::Value)>> {
        let repo = LeaderboardCacheRepository::new(&self.pool);
        let cached = repo.load(competition_id).await?;
        Ok(cached.map(|c| (c.computed_at, c.entries.0)))
    }
}

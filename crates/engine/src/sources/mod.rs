pub mod pg;
pub mod riot;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storage::models::{
    Competition, LinkedAccount, MatchRecord, RankSnapshot, RankValue, RankedQueue, RosterMember,
    Season, SnapshotKind,
};
use uuid::Uuid;

use crate::error::SourceError;
use crate::leaderboard::RankedLeaderboardEntry;

pub type SourceResult<T> = std::result::Result<T, SourceError>;

pub use pg::PgStore;
pub use riot::RiotClient;

/// Current ranked standing of one game account. Transient failures are
/// allowed; the engine decides per call site whether to swallow or
/// propagate. No retry logic lives behind this seam.
#[async_trait]
pub trait RankSource: Send + Sync {
    /// `None` means the account has no ranked history for the queue.
    async fn fetch_rank(
        &self,
        account: &LinkedAccount,
        queue: RankedQueue,
    ) -> SourceResult<Option<RankValue>>;
}

/// Bulk match-record queries against the activity store.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn query_activity(
        &self,
        puuids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SourceResult<Vec<MatchRecord>>;
}

/// Roster loading for one competition.
#[async_trait]
pub trait ParticipantSource: Send + Sync {
    /// JOINED participants with their linked accounts, in participant-id
    /// order.
    async fn joined_roster(&self, competition_id: Uuid) -> SourceResult<Vec<RosterMember>>;
}

/// Durable snapshot records. `create_if_absent` must be atomic at the
/// storage layer so concurrent backfill runs cannot write twice.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn find(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<Option<RankSnapshot>>;

    /// Returns whether a row was written; `false` means the key already
    /// held a snapshot and nothing was overwritten.
    async fn create_if_absent(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
        queue: RankedQueue,
        value: RankValue,
    ) -> SourceResult<bool>;

    async fn list(
        &self,
        competition_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<Vec<RankSnapshot>>;
}

/// Season lookups for season-dated competitions.
#[async_trait]
pub trait SeasonSource: Send + Sync {
    async fn find(&self, season_key: &str) -> SourceResult<Option<Season>>;
}

/// Competition listing for the daily update cycle.
#[async_trait]
pub trait CompetitionSource: Send + Sync {
    async fn list_current(&self, cutoff: DateTime<Utc>) -> SourceResult<Vec<Competition>>;
}

/// Advisory leaderboard cache. Written by the daily job for display
/// layers; the orchestrator never reads it.
#[async_trait]
pub trait LeaderboardCache: Send + Sync {
    async fn save(
        &self,
        competition_id: Uuid,
        computed_at: DateTime<Utc>,
        entries: &serde_json::Value,
    ) -> SourceResult<()>;

    async fn load(
        &self,
        competition_id: Uuid,
    ) -> SourceResult<Option<(DateTime<Utc>, serde_json::Value)>>;
}

/// Owner-facing messaging for the daily job. The transport (chat platform)
/// is an external collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn leaderboard_finalized(
        &self,
        competition: &Competition,
        entries: &[RankedLeaderboardEntry],
    ) -> SourceResult<()>;

    /// Data-integrity gap: an ended competition lacks a required snapshot.
    /// Sent to the owner because the system cannot self-heal this.
    async fn snapshot_gap(
        &self,
        competition: &Competition,
        participant_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<()>;
}

//! In-memory fakes and builders shared by the service and job tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::types::Json;
use storage::models::{
    Competition, Criteria, LinkedAccount, MatchRecord, Participant, RankSnapshot, RankValue,
    RankedQueue, RosterMember, Season, SnapshotKind,
};
use uuid::Uuid;

use crate::error::SourceError;
use crate::leaderboard::RankedLeaderboardEntry;
use crate::sources::{
    ActivitySource, CompetitionSource, LeaderboardCache, Notifier, ParticipantSource, RankSource,
    SeasonSource, SnapshotStore, SourceResult,
};

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
}

pub fn competition(
    criteria: Criteria,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Competition {
    Competition {
        competition_id: Uuid::new_v4(),
        guild_id: "guild-1".to_string(),
        owner_id: "owner-1".to_string(),
        title: "Test competition".to_string(),
        description: None,
        visibility: "OPEN".to_string(),
        capacity: 50,
        start_at: Some(start),
        end_at: Some(end),
        season_key: None,
        is_cancelled: false,
        criteria: Json(criteria),
        created_at: created_at(),
        updated_at: created_at(),
    }
}

pub fn season_competition(criteria: Criteria, season_key: &str) -> Competition {
    let mut competition = competition(criteria, created_at(), created_at());
    competition.start_at = None;
    competition.end_at = None;
    competition.season_key = Some(season_key.to_string());
    competition
}

pub fn season(key: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Season {
    Season {
        season_key: key.to_string(),
        start_at: start,
        end_at: end,
    }
}

pub fn member(name: &str, puuids: &[&str]) -> RosterMember {
    let owner_id = format!("owner-{name}");
    RosterMember {
        participant: Participant {
            participant_id: Uuid::new_v4(),
            competition_id: Uuid::nil(),
            owner_id: owner_id.clone(),
            display_name: name.to_string(),
            status: "JOINED".to_string(),
            joined_at: created_at(),
        },
        accounts: puuids
            .iter()
            .map(|puuid| LinkedAccount {
                puuid: (*puuid).to_string(),
                owner_id: owner_id.clone(),
                region: "euw1".to_string(),
                game_name: Some(name.to_string()),
                tag_line: Some("TEST".to_string()),
                linked_at: created_at(),
            })
            .collect(),
    }
}

pub fn record(
    puuid: &str,
    queue_id: i32,
    win: bool,
    champion_id: i32,
    played_at: DateTime<Utc>,
) -> MatchRecord {
    MatchRecord {
        match_id: format!("EUW1_{}", Uuid::new_v4().simple()),
        puuid: puuid.to_string(),
        queue_id,
        win,
        champion_id,
        played_at,
    }
}

/// Snapshot store over a mutex-guarded map, mirroring the insert-only
/// semantics of the Postgres table.
#[derive(Default)]
pub struct MemorySnapshotStore {
    rows: Mutex<HashMap<(Uuid, Uuid, SnapshotKind), RankSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
    ) -> Option<RankSnapshot> {
        self.rows
            .lock()
            .unwrap()
            .get(&(competition_id, participant_id, kind))
            .cloned()
    }

    /// Seeds a snapshot directly, bypassing capture.
    pub fn insert(
        &self,
        competition: &Competition,
        participant_id: Uuid,
        kind: SnapshotKind,
        value: RankValue,
    ) {
        let queue = competition
            .criteria()
            .ranked_queue()
            .unwrap_or(RankedQueue::Solo);
        let row = snapshot_row(
            competition.competition_id,
            participant_id,
            kind,
            queue,
            value,
        );
        self.rows
            .lock()
            .unwrap()
            .insert((competition.competition_id, participant_id, kind), row);
    }
}

fn snapshot_row(
    competition_id: Uuid,
    participant_id: Uuid,
    kind: SnapshotKind,
    queue: RankedQueue,
    value: RankValue,
) -> RankSnapshot {
    RankSnapshot {
        competition_id,
        participant_id,
        kind: kind.as_str().to_string(),
        queue: queue.as_str().to_string(),
        tier: value.tier.as_str().to_string(),
        division: value.division.as_str().to_string(),
        league_points: value.league_points,
        captured_at: Utc::now(),
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn find(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<Option<RankSnapshot>> {
        Ok(self.get(competition_id, participant_id, kind))
    }

    async fn create_if_absent(
        &self,
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
        queue: RankedQueue,
        value: RankValue,
    ) -> SourceResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let key = (competition_id, participant_id, kind);
        if rows.contains_key(&key) {
            return Ok(false);
        }
        rows.insert(
            key,
            snapshot_row(competition_id, participant_id, kind, queue, value),
        );
        Ok(true)
    }

    async fn list(
        &self,
        competition_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<Vec<RankSnapshot>> {
        let rows = self.rows.lock().unwrap();
        let mut snapshots: Vec<RankSnapshot> = rows
            .values()
            .filter(|s| s.competition_id == competition_id && s.kind == kind.as_str())
            .cloned()
            .collect();
        snapshots.sort_by_key(|s| s.participant_id);
        Ok(snapshots)
    }
}

/// Rank source answering from a mutable map; accounts can be marked as
/// failing to simulate adapter outages. Absent accounts are unranked.
#[derive(Clone, Default)]
pub struct StubRankSource {
    ranks: Arc<Mutex<HashMap<String, RankValue>>>,
    failures: Arc<Mutex<HashSet<String>>>,
}

impl StubRankSource {
    pub fn with_rank(self, puuid: &str, value: RankValue) -> Self {
        self.set_rank(puuid, value);
        self
    }

    pub fn with_failure(self, puuid: &str) -> Self {
        self.set_failure(puuid);
        self
    }

    pub fn set_rank(&self, puuid: &str, value: RankValue) {
        self.ranks.lock().unwrap().insert(puuid.to_string(), value);
    }

    pub fn set_failure(&self, puuid: &str) {
        self.failures.lock().unwrap().insert(puuid.to_string());
    }
}

#[async_trait]
impl RankSource for StubRankSource {
    async fn fetch_rank(
        &self,
        account: &LinkedAccount,
        _queue: RankedQueue,
    ) -> SourceResult<Option<RankValue>> {
        if self.failures.lock().unwrap().contains(&account.puuid) {
            return Err(SourceError::Unavailable(format!(
                "stubbed outage for {}",
                account.puuid
            )));
        }
        Ok(self.ranks.lock().unwrap().get(&account.puuid).copied())
    }
}

/// Serves the same roster for every competition id.
pub struct StubParticipantSource {
    roster: Vec<RosterMember>,
}

impl StubParticipantSource {
    pub fn new(roster: Vec<RosterMember>) -> Self {
        Self { roster }
    }
}

#[async_trait]
impl ParticipantSource for StubParticipantSource {
    async fn joined_roster(&self, _competition_id: Uuid) -> SourceResult<Vec<RosterMember>> {
        Ok(self.roster.clone())
    }
}

/// Serves a fixed record set, filtered the way the bulk query would.
pub struct StubActivitySource {
    records: Vec<MatchRecord>,
}

impl StubActivitySource {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ActivitySource for StubActivitySource {
    async fn query_activity(
        &self,
        puuids: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SourceResult<Vec<MatchRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| {
                puuids.contains(&r.puuid) && r.played_at >= from && r.played_at <= to
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct StubSeasonSource {
    seasons: HashMap<String, Season>,
}

#[async_trait]
impl SeasonSource for StubSeasonSource {
    async fn find(&self, season_key: &str) -> SourceResult<Option<Season>> {
        Ok(self.seasons.get(season_key).cloned())
    }
}

/// Mirrors the repository listing: cancelled competitions are out, fixed
/// windows are cut off on `end_at`, season windows on the known season end.
/// Unknown seasons stay listed.
pub struct StubCompetitionSource {
    competitions: Vec<Competition>,
    season_ends: HashMap<String, DateTime<Utc>>,
}

impl StubCompetitionSource {
    pub fn new(competitions: Vec<Competition>) -> Self {
        Self {
            competitions,
            season_ends: HashMap::new(),
        }
    }

    pub fn with_season_end(mut self, season_key: &str, end: DateTime<Utc>) -> Self {
        self.season_ends.insert(season_key.to_string(), end);
        self
    }
}

#[async_trait]
impl CompetitionSource for StubCompetitionSource {
    async fn list_current(&self, cutoff: DateTime<Utc>) -> SourceResult<Vec<Competition>> {
        Ok(self
            .competitions
            .iter()
            .filter(|c| {
                if c.is_cancelled {
                    return false;
                }
                match c.end_at {
                    Some(end) => end >= cutoff,
                    None => c
                        .season_key
                        .as_ref()
                        .and_then(|key| self.season_ends.get(key))
                        .is_none_or(|end| *end >= cutoff),
                }
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryLeaderboardCache {
    saved: Mutex<HashMap<Uuid, (DateTime<Utc>, serde_json::Value)>>,
}

impl MemoryLeaderboardCache {
    pub fn computed_at(&self, competition_id: Uuid) -> Option<DateTime<Utc>> {
        self.saved
            .lock()
            .unwrap()
            .get(&competition_id)
            .map(|(at, _)| *at)
    }
}

#[async_trait]
impl LeaderboardCache for MemoryLeaderboardCache {
    async fn save(
        &self,
        competition_id: Uuid,
        computed_at: DateTime<Utc>,
        entries: &serde_json::Value,
    ) -> SourceResult<()> {
        self.saved
            .lock()
            .unwrap()
            .insert(competition_id, (computed_at, entries.clone()));
        Ok(())
    }

    async fn load(
        &self,
        competition_id: Uuid,
    ) -> SourceResult<Option<(DateTime<Utc>, serde_json::Value)>> {
        Ok(self.saved.lock().unwrap().get(&competition_id).cloned())
    }
}

/// Records what the job would post without any transport.
#[derive(Default)]
pub struct RecordingNotifier {
    finalized: Mutex<Vec<Uuid>>,
    gaps: Mutex<Vec<(Uuid, Uuid, SnapshotKind)>>,
}

impl RecordingNotifier {
    pub fn finalized(&self) -> Vec<Uuid> {
        self.finalized.lock().unwrap().clone()
    }

    pub fn gaps(&self) -> Vec<(Uuid, Uuid, SnapshotKind)> {
        self.gaps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn leaderboard_finalized(
        &self,
        competition: &Competition,
        _entries: &[RankedLeaderboardEntry],
    ) -> SourceResult<()> {
        self.finalized
            .lock()
            .unwrap()
            .push(competition.competition_id);
        Ok(())
    }

    async fn snapshot_gap(
        &self,
        competition: &Competition,
        participant_id: Uuid,
        kind: SnapshotKind,
    ) -> SourceResult<()> {
        self.gaps
            .lock()
            .unwrap()
            .push((competition.competition_id, participant_id, kind));
        Ok(())
    }
}

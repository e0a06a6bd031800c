pub mod processors;
pub mod ranker;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage::models::{Competition, Criteria, RankValue, RankedQueue, RosterMember, SnapshotKind};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::sources::{ActivitySource, ParticipantSource, RankSource, SeasonSource, SnapshotStore};
use crate::status::{CompetitionStatus, CompetitionWindow, resolve_status, resolve_window};

/// A participant's raw score. Numeric scores compare directly; composite
/// rank scores compare through the fixed league-points reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Numeric(Decimal),
    Rank(RankValue),
}

impl Score {
    /// The comparable projection used for both sorting and tie equality.
    pub fn sort_key(&self) -> Decimal {
        match self {
            Score::Numeric(value) => *value,
            Score::Rank(rank) => Decimal::from(rank.reduced_league_points()),
        }
    }
}

/// Display stats carried alongside a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryStats {
    pub wins: u32,
    pub games: u32,
}

/// One scored participant, before rank assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub participant_id: Uuid,
    pub display_name: String,
    pub score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<EntryStats>,
}

/// One standing on the computed leaderboard. Ranks are dense with gaps:
/// ties share a rank and the next distinct score takes its 1-based
/// position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLeaderboardEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

/// Snapshot-side inputs for the two rank criteria. Exactly one of
/// `end`/`current` is populated per computation: `end` from stored END
/// snapshots when the competition is over, `current` from live lookups
/// otherwise.
#[derive(Debug, Default)]
pub struct SnapshotBundle {
    pub start: HashMap<Uuid, RankValue>,
    pub end: HashMap<Uuid, RankValue>,
    pub current: HashMap<Uuid, RankValue>,
}

impl SnapshotBundle {
    /// The "after" side of the comparison for one participant.
    pub fn latest(&self, participant_id: Uuid) -> Option<RankValue> {
        self.end
            .get(&participant_id)
            .or_else(|| self.current.get(&participant_id))
            .copied()
    }
}

/// Top-level entry point: resolves status, fetches what the criteria
/// needs, scores and ranks.
pub struct LeaderboardService {
    participants: Arc<dyn ParticipantSource>,
    snapshots: Arc<dyn SnapshotStore>,
    ranks: Arc<dyn RankSource>,
    activity: Arc<dyn ActivitySource>,
    seasons: Arc<dyn SeasonSource>,
}

impl LeaderboardService {
    pub fn new(
        participants: Arc<dyn ParticipantSource>,
        snapshots: Arc<dyn SnapshotStore>,
        ranks: Arc<dyn RankSource>,
        activity: Arc<dyn ActivitySource>,
        seasons: Arc<dyn SeasonSource>,
    ) -> Self {
        Self {
            participants,
            snapshots,
            ranks,
            activity,
            seasons,
        }
    }

    /// Resolves the competition's concrete window, loading the season row
    /// when the date specification is season-keyed.
    pub async fn resolve_window(&self, competition: &Competition) -> Result<CompetitionWindow> {
        let season = match competition.season_key.as_deref() {
            Some(key) => self.seasons.find(key).await?,
            None => None,
        };
        resolve_window(competition, season.as_ref())
    }

    pub async fn calculate_leaderboard(
        &self,
        competition: &Competition,
    ) -> Result<Vec<RankedLeaderboardEntry>> {
        self.calculate_leaderboard_at(competition, Utc::now()).await
    }

    pub async fn calculate_leaderboard_at(
        &self,
        competition: &Competition,
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedLeaderboardEntry>> {
        let window = self.resolve_window(competition).await?;
        let status = resolve_status(competition.is_cancelled, window, now);

        // A competition that has not started has no leaderboard.
        if status == CompetitionStatus::Draft {
            return Err(EngineError::InvalidLifecycle {
                competition_id: competition.competition_id,
            });
        }

        let roster = self
            .participants
            .joined_roster(competition.competition_id)
            .await?;
        if roster.is_empty() {
            return Ok(Vec::new());
        }

        let criteria = competition.criteria();

        let records = if criteria.needs_activity_data() {
            let puuids: Vec<String> = roster.iter().flat_map(RosterMember::puuids).collect();
            self.activity
                .query_activity(&puuids, window.start, window.effective_end(now))
                .await?
        } else {
            Vec::new()
        };

        let bundle = if criteria.needs_snapshot_data() {
            Some(
                self.load_snapshot_bundle(competition, &roster, status, criteria)
                    .await?,
            )
        } else {
            None
        };

        let entries = processors::score_entries(criteria, &roster, &records, bundle.as_ref());
        let standings = ranker::assign_ranks(entries);

        info!(
            competition_id = %competition.competition_id,
            status = %status,
            entries = standings.len(),
            "leaderboard computed"
        );

        Ok(standings)
    }

    /// Builds the snapshot bundle for a rank criteria.
    ///
    /// ENDED competitions read stored history only: a missing required
    /// snapshot is the fatal, typed error, never papered over with a live
    /// lookup. Everything else uses live lookups for the "current" side,
    /// swallowing per-participant failures.
    async fn load_snapshot_bundle(
        &self,
        competition: &Competition,
        roster: &[RosterMember],
        status: CompetitionStatus,
        criteria: &Criteria,
    ) -> Result<SnapshotBundle> {
        let queue = criteria.ranked_queue().ok_or_else(|| {
            EngineError::Validation(format!(
                "competition {} criteria does not use snapshots",
                competition.competition_id
            ))
        })?;
        let competition_id = competition.competition_id;
        let mut bundle = SnapshotBundle::default();

        if criteria.needs_start_snapshot() {
            for member in roster {
                let participant_id = member.participant_id();
                match self
                    .snapshots
                    .find(competition_id, participant_id, SnapshotKind::Start)
                    .await?
                {
                    Some(snapshot) => {
                        if let Some(value) = snapshot.rank_value() {
                            bundle.start.insert(participant_id, value);
                        }
                    }
                    None if status == CompetitionStatus::Ended => {
                        return Err(EngineError::MissingSnapshot {
                            competition_id,
                            participant_id,
                            kind: SnapshotKind::Start,
                        });
                    }
                    // Not yet baselined; stays off the board until the
                    // backfill picks them up.
                    None => {}
                }
            }
        }

        if status == CompetitionStatus::Ended {
            for member in roster {
                let participant_id = member.participant_id();
                let snapshot = self
                    .snapshots
                    .find(competition_id, participant_id, SnapshotKind::End)
                    .await?
                    .ok_or(EngineError::MissingSnapshot {
                        competition_id,
                        participant_id,
                        kind: SnapshotKind::End,
                    })?;
                if let Some(value) = snapshot.rank_value() {
                    bundle.end.insert(participant_id, value);
                }
            }
        } else {
            let lookups = roster
                .iter()
                .map(|member| async move {
                    (member.participant_id(), self.fetch_live(member, queue).await)
                })
                .collect::<Vec<_>>();

            for (participant_id, value) in join_all(lookups).await {
                match value {
                    Some(value) => {
                        bundle.current.insert(participant_id, value);
                    }
                    None => {
                        warn!(
                            %competition_id,
                            %participant_id,
                            "no live rank available; participant omitted"
                        );
                    }
                }
            }
        }

        Ok(bundle)
    }

    /// Live lookup across a member's linked accounts, first usable account
    /// wins. Failures are per-participant: log and move on.
    async fn fetch_live(&self, member: &RosterMember, queue: RankedQueue) -> Option<RankValue> {
        for account in &member.accounts {
            match self.ranks.fetch_rank(account, queue).await {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(err) => {
                    warn!(puuid = %account.puuid, error = %err, "live rank fetch failed");
                }
            }
        }
        None
    }
}

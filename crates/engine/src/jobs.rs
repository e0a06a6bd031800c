use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use storage::models::{Competition, SnapshotKind};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::leaderboard::{LeaderboardService, RankedLeaderboardEntry};
use crate::snapshot::SnapshotService;
use crate::sources::{CompetitionSource, LeaderboardCache, Notifier, ParticipantSource};
use crate::status::{CompetitionStatus, CompetitionWindow, resolve_status};

/// How long after its end a competition keeps being picked up, so a missed
/// cycle can still finalize it.
fn finalize_grace() -> Duration {
    Duration::days(3)
}

/// One pass of the scheduled update cycle: backfills baselines for active
/// climb competitions, refreshes the advisory cache, and finalizes
/// competitions that have ended. Competitions are processed independently;
/// one failure never aborts the others.
pub struct DailyUpdate {
    competitions: Arc<dyn CompetitionSource>,
    participants: Arc<dyn ParticipantSource>,
    snapshots: SnapshotService,
    leaderboards: LeaderboardService,
    cache: Arc<dyn LeaderboardCache>,
    notifier: Arc<dyn Notifier>,
}

impl DailyUpdate {
    pub fn new(
        competitions: Arc<dyn CompetitionSource>,
        participants: Arc<dyn ParticipantSource>,
        snapshots: SnapshotService,
        leaderboards: LeaderboardService,
        cache: Arc<dyn LeaderboardCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            competitions,
            participants,
            snapshots,
            leaderboards,
            cache,
            notifier,
        }
    }

    pub async fn run(&self) -> Result<()> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<()> {
        let competitions = self.competitions.list_current(now - finalize_grace()).await?;
        info!(count = competitions.len(), "daily update cycle starting");

        let work = competitions
            .iter()
            .map(|competition| async move {
                if let Err(err) = self.handle_competition(competition, now).await {
                    error!(
                        competition_id = %competition.competition_id,
                        error = %err,
                        "competition update failed"
                    );
                }
            })
            .collect::<Vec<_>>();
        join_all(work).await;

        Ok(())
    }

    async fn handle_competition(
        &self,
        competition: &Competition,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let window = self.leaderboards.resolve_window(competition).await?;
        match resolve_status(competition.is_cancelled, window, now) {
            CompetitionStatus::Draft | CompetitionStatus::Cancelled => {
                debug!(competition_id = %competition.competition_id, "nothing to update");
                Ok(())
            }
            CompetitionStatus::Active => self.refresh_active(competition, now).await,
            CompetitionStatus::Ended => self.finalize_ended(competition, window, now).await,
        }
    }

    async fn refresh_active(&self, competition: &Competition, now: DateTime<Utc>) -> Result<()> {
        if competition.criteria().needs_start_snapshot() {
            let roster = self
                .participants
                .joined_roster(competition.competition_id)
                .await?;
            self.snapshots
                .backfill_start_snapshots(competition, &roster)
                .await?;
        }

        let standings = self
            .leaderboards
            .calculate_leaderboard_at(competition, now)
            .await?;
        self.save_cache(competition.competition_id, now, &standings)
            .await
    }

    async fn finalize_ended(
        &self,
        competition: &Competition,
        window: CompetitionWindow,
        now: DateTime<Utc>,
    ) -> Result<()> {
        // A cache entry computed at or after the end means the final board
        // is already out.
        if let Some((computed_at, _)) = self.cache.load(competition.competition_id).await? {
            if computed_at >= window.end {
                return Ok(());
            }
        }

        if competition.criteria().needs_snapshot_data() {
            let roster = self
                .participants
                .joined_roster(competition.competition_id)
                .await?;
            self.snapshots
                .capture_for_roster(competition, &roster, SnapshotKind::End)
                .await?;
        }

        match self
            .leaderboards
            .calculate_leaderboard_at(competition, now)
            .await
        {
            Ok(standings) => {
                self.save_cache(competition.competition_id, now, &standings)
                    .await?;
                if let Err(err) = self
                    .notifier
                    .leaderboard_finalized(competition, &standings)
                    .await
                {
                    warn!(
                        competition_id = %competition.competition_id,
                        error = %err,
                        "final leaderboard notification failed"
                    );
                }
                Ok(())
            }
            // Data-integrity gap: tell the owner which measurement is
            // absent instead of failing the run. Finalization retries next
            // cycle once an operator fills the gap.
            Err(EngineError::MissingSnapshot {
                competition_id,
                participant_id,
                kind,
            }) => {
                warn!(
                    %competition_id,
                    %participant_id,
                    %kind,
                    "cannot finalize: snapshot missing, remediation notice posted"
                );
                if let Err(err) = self
                    .notifier
                    .snapshot_gap(competition, participant_id, kind)
                    .await
                {
                    warn!(%competition_id, error = %err, "remediation notice failed");
                }
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn save_cache(
        &self,
        competition_id: Uuid,
        computed_at: DateTime<Utc>,
        standings: &[RankedLeaderboardEntry],
    ) -> Result<()> {
        let entries = serde_json::to_value(standings)?;
        self.cache
            .save(competition_id, computed_at, &entries)
            .await?;
        Ok(())
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use storage::models::{Competition, RankValue, RankedQueue, RosterMember, SnapshotKind};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::sources::{RankSource, SnapshotStore};

/// What a capture attempt did for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Created,
    /// The key already held a snapshot; it was left untouched.
    AlreadyExists,
    /// The competition's criteria does not use snapshots.
    NotRequired,
    /// No linked account yielded usable rank data. Expected for unranked
    /// participants; an adapter outage across all accounts lands here too
    /// and is distinguishable only via the logs.
    NotEligible,
}

/// Captures and backfills the immutable baseline/ending rank measurements.
pub struct SnapshotService {
    store: Arc<dyn SnapshotStore>,
    ranks: Arc<dyn RankSource>,
}

impl SnapshotService {
    pub fn new(store: Arc<dyn SnapshotStore>, ranks: Arc<dyn RankSource>) -> Self {
        Self { store, ranks }
    }

    /// Idempotent capture of one snapshot. An existing snapshot is never
    /// overwritten; a participant with no usable rank data stays
    /// ineligible and no row is written.
    pub async fn create_snapshot(
        &self,
        competition: &Competition,
        member: &RosterMember,
        kind: SnapshotKind,
    ) -> Result<SnapshotOutcome> {
        let Some(queue) = competition.criteria().ranked_queue() else {
            return Ok(SnapshotOutcome::NotRequired);
        };

        let competition_id = competition.competition_id;
        let participant_id = member.participant_id();

        if self
            .store
            .find(competition_id, participant_id, kind)
            .await?
            .is_some()
        {
            return Ok(SnapshotOutcome::AlreadyExists);
        }

        let Some(value) = self.measure(member, queue).await else {
            debug!(
                %competition_id,
                %participant_id,
                %kind,
                "no usable rank data; snapshot not created"
            );
            return Ok(SnapshotOutcome::NotEligible);
        };

        let created = self
            .store
            .create_if_absent(competition_id, participant_id, kind, queue, value)
            .await?;

        if created {
            info!(%competition_id, %participant_id, %kind, rank = %value, "snapshot captured");
            Ok(SnapshotOutcome::Created)
        } else {
            // Lost the race to a concurrent capture; the stored row wins.
            Ok(SnapshotOutcome::AlreadyExists)
        }
    }

    /// First linked account with ranked history for the queue wins; a
    /// transient failure on one account is logged and the next is tried.
    async fn measure(&self, member: &RosterMember, queue: RankedQueue) -> Option<RankValue> {
        for account in &member.accounts {
            match self.ranks.fetch_rank(account, queue).await {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {
                    debug!(puuid = %account.puuid, queue = queue.as_str(), "no ranked history");
                }
                Err(err) => {
                    warn!(puuid = %account.puuid, error = %err, "rank fetch failed; trying next account");
                }
            }
        }
        None
    }

    /// Captures one snapshot kind for a whole roster, fanning the
    /// per-participant fetches out in parallel.
    pub async fn capture_for_roster(
        &self,
        competition: &Competition,
        roster: &[RosterMember],
        kind: SnapshotKind,
    ) -> Result<Vec<(Uuid, SnapshotOutcome)>> {
        let captures = roster
            .iter()
            .map(|member| async move {
                let outcome = self.create_snapshot(competition, member, kind).await?;
                Ok((member.participant_id(), outcome))
            })
            .collect::<Vec<_>>();

        join_all(captures).await.into_iter().collect()
    }

    /// Converges MOST_RANK_CLIMB participants from "ineligible" to "has a
    /// start baseline" exactly once. Safe to call unconditionally and
    /// repeatedly; a no-op for every other criteria. Returns the number of
    /// snapshots written.
    pub async fn backfill_start_snapshots(
        &self,
        competition: &Competition,
        roster: &[RosterMember],
    ) -> Result<usize> {
        if !competition.criteria().needs_start_snapshot() {
            return Ok(0);
        }

        // One list query instead of a per-participant lookup; whoever
        // already holds a baseline is skipped without touching the rank
        // source.
        let baselined: HashSet<Uuid> = self
            .store
            .list(competition.competition_id, SnapshotKind::Start)
            .await?
            .into_iter()
            .map(|snapshot| snapshot.participant_id)
            .collect();

        let missing: Vec<RosterMember> = roster
            .iter()
            .filter(|member| !baselined.contains(&member.participant_id()))
            .cloned()
            .collect();

        let outcomes = self
            .capture_for_roster(competition, &missing, SnapshotKind::Start)
            .await?;

        let created = outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == SnapshotOutcome::Created)
            .count();

        if created > 0 {
            info!(
                competition_id = %competition.competition_id,
                created,
                "backfilled start snapshots"
            );
        }

        Ok(created)
    }
}

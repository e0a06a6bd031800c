use serde::{Deserialize, Serialize};

/// Scoring rule for a competition. Stored as JSONB on the competition row.
///
/// The first four variants produce numeric scores from match records; the
/// last two produce composite rank scores from snapshots or live lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criteria {
    MostGamesPlayed {
        queue: GameQueue,
    },
    MostWinsPlayer {
        queue: GameQueue,
    },
    MostWinsChampion {
        champion_id: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        queue: Option<GameQueue>,
    },
    HighestWinRate {
        queue: GameQueue,
        min_games: u32,
    },
    HighestRank {
        queue: RankedQueue,
    },
    MostRankClimb {
        queue: RankedQueue,
    },
}

impl Criteria {
    /// Whether leaderboard computation needs bulk match records.
    pub fn needs_activity_data(&self) -> bool {
        matches!(
            self,
            Criteria::MostGamesPlayed { .. }
                | Criteria::MostWinsPlayer { .. }
                | Criteria::MostWinsChampion { .. }
                | Criteria::HighestWinRate { .. }
        )
    }

    /// Whether leaderboard computation needs rank snapshots / live ranks.
    pub fn needs_snapshot_data(&self) -> bool {
        matches!(
            self,
            Criteria::HighestRank { .. } | Criteria::MostRankClimb { .. }
        )
    }

    /// The ranked queue a rank-based criteria measures, if any.
    pub fn ranked_queue(&self) -> Option<RankedQueue> {
        match self {
            Criteria::HighestRank { queue } | Criteria::MostRankClimb { queue } => Some(*queue),
            _ => None,
        }
    }

    /// START snapshots are only consumed by MOST_RANK_CLIMB.
    pub fn needs_start_snapshot(&self) -> bool {
        matches!(self, Criteria::MostRankClimb { .. })
    }
}

/// Queue filter for the activity-based criteria, mapped to Riot queue ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameQueue {
    RankedSolo,
    RankedFlex,
    Aram,
    Normal,
}

impl GameQueue {
    pub fn queue_ids(&self) -> &'static [i32] {
        match self {
            GameQueue::RankedSolo => &[420],
            GameQueue::RankedFlex => &[440],
            GameQueue::Aram => &[450],
            GameQueue::Normal => &[400, 430, 490],
        }
    }

    pub fn matches(&self, queue_id: i32) -> bool {
        self.queue_ids().contains(&queue_id)
    }
}

/// Ranked ladder for the rank-based criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankedQueue {
    Solo,
    Flex,
}

impl RankedQueue {
    /// Queue type string used by the Riot league endpoints.
    pub fn riot_queue_type(&self) -> &'static str {
        match self {
            RankedQueue::Solo => "RANKED_SOLO_5x5",
            RankedQueue::Flex => "RANKED_FLEX_SR",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankedQueue::Solo => "SOLO",
            RankedQueue::Flex => "FLEX",
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::rank::{Division, RankValue, Tier};

/// Which side of the before/after comparison a snapshot records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotKind {
    Start,
    End,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Start => "START",
            SnapshotKind::End => "END",
        }
    }

    pub fn parse(s: &str) -> Option<SnapshotKind> {
        match s {
            "START" => Some(SnapshotKind::Start),
            "END" => Some(SnapshotKind::End),
            _ => None,
        }
    }
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable point-in-time rank measurement. At most one row exists per
/// (competition, participant, kind); creation skips if the key is taken.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankSnapshot {
    pub competition_id: Uuid,
    pub participant_id: Uuid,
    pub kind: String,
    pub queue: String,
    pub tier: String,
    pub division: String,
    pub league_points: i32,
    pub captured_at: DateTime<Utc>,
}

impl RankSnapshot {
    /// Decodes the stored payload back into a composite rank value.
    /// `None` only for rows written with tier/division strings the model
    /// does not know, which the repository never produces.
    pub fn rank_value(&self) -> Option<RankValue> {
        let tier = Tier::parse(&self.tier)?;
        let division = Division::parse(&self.division)?;
        Some(RankValue::new(tier, division, self.league_points))
    }
}

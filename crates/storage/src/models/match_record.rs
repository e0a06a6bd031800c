use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One played match for one tracked account, as ingested into the bulk
/// activity store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRecord {
    pub match_id: String,
    pub puuid: String,
    pub queue_id: i32,
    pub win: bool,
    pub champion_id: i32,
    pub played_at: DateTime<Utc>,
}

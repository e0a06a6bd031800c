use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Named season resolving a season-keyed date specification to concrete
/// dates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Season {
    pub season_key: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

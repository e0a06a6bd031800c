use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Advisory cached leaderboard, written by the daily job for display
/// layers. The orchestrator never reads it, it always recomputes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CachedLeaderboard {
    pub competition_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub entries: sqlx::types::Json<serde_json::Value>,
}

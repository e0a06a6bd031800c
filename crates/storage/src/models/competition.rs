use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::Criteria;

/// Competition row. The date specification is either the fixed
/// `start_at`/`end_at` pair or a `season_key` resolved through the seasons
/// table; exactly one of the two is populated (enforced by a CHECK
/// constraint and by request validation).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Competition {
    pub competition_id: Uuid,
    pub guild_id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub visibility: String,
    pub capacity: i32,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub season_key: Option<String>,
    pub is_cancelled: bool,
    pub criteria: Json<Criteria>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Competition {
    pub fn criteria(&self) -> &Criteria {
        &self.criteria.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Open,
    InviteOnly,
    ServerWide,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Open => "OPEN",
            Visibility::InviteOnly => "INVITE_ONLY",
            Visibility::ServerWide => "SERVER_WIDE",
        }
    }

    pub fn parse(s: &str) -> Option<Visibility> {
        let visibility = match s {
            "OPEN" => Visibility::Open,
            "INVITE_ONLY" => Visibility::InviteOnly,
            "SERVER_WIDE" => Visibility::ServerWide,
            _ => return None,
        };
        Some(visibility)
    }
}

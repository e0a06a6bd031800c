use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Membership of a tracked-account owner in one competition. Never
/// hard-deleted; removal is a status transition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub participant_id: Uuid,
    pub competition_id: Uuid,
    pub owner_id: String,
    pub display_name: String,
    pub status: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantStatus {
    Joined,
    Left,
    Removed,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Joined => "JOINED",
            ParticipantStatus::Left => "LEFT",
            ParticipantStatus::Removed => "REMOVED",
        }
    }
}

/// A game account linked to an owner. `puuid` is the opaque stable account
/// identifier; `region` is the platform routing value (e.g. `euw1`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinkedAccount {
    pub puuid: String,
    pub owner_id: String,
    pub region: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
    pub linked_at: DateTime<Utc>,
}

/// A JOINED participant together with the owner's linked accounts, as
/// loaded for leaderboard computation and snapshot capture.
#[derive(Debug, Clone)]
pub struct RosterMember {
    pub participant: Participant,
    pub accounts: Vec<LinkedAccount>,
}

impl RosterMember {
    pub fn participant_id(&self) -> Uuid {
        self.participant.participant_id
    }

    pub fn puuids(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.puuid.clone()).collect()
    }
}

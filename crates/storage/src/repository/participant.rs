use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::participant::{JoinCompetitionRequest, LinkAccountRequest};
use crate::error::{Result, StorageError};
use crate::models::{LinkedAccount, Participant, ParticipantStatus, RosterMember};

/// Repository for Participant and LinkedAccount database operations
pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    /// Create a new ParticipantRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add an owner to a competition
    pub async fn join(&self, req: &JoinCompetitionRequest) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(
            "INSERT INTO participants (competition_id, owner_id, display_name, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING participant_id, competition_id, owner_id, display_name, status, joined_at",
        )
        .bind(req.competition_id)
        .bind(&req.owner_id)
        .bind(&req.display_name)
        .bind(ParticipantStatus::Joined.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            StorageError::on_unique_violation(e, "Owner already joined this competition")
        })?;

        Ok(participant)
    }

    /// Transition a participant's membership status
    pub async fn set_status(&self, participant_id: Uuid, status: ParticipantStatus) -> Result<()> {
        let result = sqlx::query("UPDATE participants SET status = $2 WHERE participant_id = $1")
            .bind(participant_id)
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Link a game account to an owner; linking the same puuid again is a
    /// constraint violation
    pub async fn link_account(&self, req: &LinkAccountRequest) -> Result<LinkedAccount> {
        let account = sqlx::query_as::<_, LinkedAccount>(
            "INSERT INTO linked_accounts (puuid, owner_id, region, game_name, tag_line) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING puuid, owner_id, region, game_name, tag_line, linked_at",
        )
        .bind(&req.puuid)
        .bind(&req.owner_id)
        .bind(&req.region)
        .bind(&req.game_name)
        .bind(&req.tag_line)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::on_unique_violation(e, "Account is already linked"))?;

        Ok(account)
    }

    /// Load all JOINED participants of a competition with their owners'
    /// linked accounts, ordered by participant id so downstream iteration
    /// is deterministic.
    pub async fn joined_roster(&self, competition_id: Uuid) -> Result<Vec<RosterMember>> {
        let participants = sqlx::query_as::<_, Participant>(
            "SELECT participant_id, competition_id, owner_id, display_name, status, joined_at \
             FROM participants \
             WHERE competition_id = $1 AND status = $2 \
             ORDER BY participant_id",
        )
        .bind(competition_id)
        .bind(ParticipantStatus::Joined.as_str())
        .fetch_all(self.pool)
        .await?;

        if participants.is_empty() {
            return Ok(Vec::new());
        }

        let owner_ids: Vec<String> = participants.iter().map(|p| p.owner_id.clone()).collect();
        let accounts = sqlx::query_as::<_, LinkedAccount>(
            "SELECT puuid, owner_id, region, game_name, tag_line, linked_at \
             FROM linked_accounts \
             WHERE owner_id = ANY($1) \
             ORDER BY linked_at",
        )
        .bind(&owner_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_owner: HashMap<String, Vec<LinkedAccount>> = HashMap::new();
        for account in accounts {
            by_owner.entry(account.owner_id.clone()).or_default().push(account);
        }

        let roster = participants
            .into_iter()
            .map(|participant| {
                let accounts = by_owner.remove(&participant.owner_id).unwrap_or_default();
                RosterMember {
                    participant,
                    accounts,
                }
            })
            .collect();

        Ok(roster)
    }
}

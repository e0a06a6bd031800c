use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Criteria;

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCompetitionRequest {
    #[validate(length(min = 1, max = 64))]
    pub guild_id: String,

    #[validate(length(min = 1, max = 64))]
    pub owner_id: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,

    #[validate(length(max = 1024))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_visibility"))]
    #[serde(default = "default_visibility")]
    pub visibility: String,

    #[validate(range(min = 2, max = 500, message = "Capacity must be between 2 and 500"))]
    pub capacity: i32,

    pub start_at: Option<DateTime<Utc>>,

    pub end_at: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 64))]
    pub season_key: Option<String>,

    pub criteria: Criteria,
}

fn default_visibility() -> String {
    "OPEN".to_string()
}

fn validate_visibility(visibility: &str) -> Result<(), validator::ValidationError> {
    const VALID_VISIBILITIES: &[&str] = &["OPEN", "INVITE_ONLY", "SERVER_WIDE"];

    if VALID_VISIBILITIES.contains(&visibility) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_visibility"))
    }
}

impl CreateCompetitionRequest {
    /// Additional validation that requires multiple fields: the date
    /// specification is either the fixed pair or a season key, never both,
    /// never neither, and a fixed window must start before it ends.
    pub fn validate_dates(&self) -> Result<(), &'static str> {
        match (self.start_at, self.end_at, self.season_key.as_deref()) {
            (Some(start), Some(end), None) => {
                if start >= end {
                    return Err("Start date must be before end date");
                }
                Ok(())
            }
            (None, None, Some(_)) => Ok(()),
            (Some(_), None, None) | (None, Some(_), None) => {
                Err("Fixed dates require both a start and an end")
            }
            _ => Err("Provide either fixed dates or a season, not both"),
        }
    }
}

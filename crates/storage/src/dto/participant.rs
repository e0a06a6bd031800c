use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for joining a competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinCompetitionRequest {
    pub competition_id: Uuid,

    #[validate(length(min = 1, max = 64))]
    pub owner_id: String,

    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
}

/// Request payload for linking a game account to an owner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LinkAccountRequest {
    #[validate(length(min = 1, max = 128))]
    pub puuid: String,

    #[validate(length(min = 1, max = 64))]
    pub owner_id: String,

    #[validate(custom(function = "validate_region"))]
    pub region: String,

    #[validate(length(min = 3, max = 16))]
    pub game_name: Option<String>,

    #[validate(length(min = 2, max = 5))]
    pub tag_line: Option<String>,
}

fn validate_region(region: &str) -> Result<(), validator::ValidationError> {
    const VALID_REGIONS: &[&str] = &[
        "br1", "eun1", "euw1", "jp1", "kr", "la1", "la2", "me1", "na1", "oc1", "ru", "sg2", "tr1",
        "tw2", "vn2",
    ];

    if VALID_REGIONS.contains(&region) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_region"))
    }
}

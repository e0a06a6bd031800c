use storage::StorageError;
use storage::models::SnapshotKind;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Leaderboard requested for a competition that has not started.
    #[error("Competition {competition_id} has not started yet")]
    InvalidLifecycle { competition_id: Uuid },

    /// An ended competition is missing required rank history. Cannot be
    /// self-healed; the owner is told which measurement is absent so an
    /// operator can capture it manually.
    #[error(
        "Competition {competition_id} is missing the {kind} snapshot for participant {participant_id}"
    )]
    MissingSnapshot {
        competition_id: Uuid,
        participant_id: Uuid,
        kind: SnapshotKind,
    },

    /// Malformed competition record, e.g. a broken date specification.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Failure of an external source adapter. Per-participant occurrences are
/// logged and the participant excluded; bulk occurrences propagate.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

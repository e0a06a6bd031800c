pub mod error;
pub mod jobs;
pub mod leaderboard;
pub mod snapshot;
pub mod sources;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{EngineError, Result, SourceError};
pub use leaderboard::{LeaderboardEntry, LeaderboardService, RankedLeaderboardEntry, Score};
pub use snapshot::{SnapshotOutcome, SnapshotService};
pub use status::{CompetitionStatus, CompetitionWindow, resolve_status, resolve_window};

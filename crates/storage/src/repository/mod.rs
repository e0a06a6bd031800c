pub mod competition;
pub mod leaderboard_cache;
pub mod match_record;
pub mod participant;
pub mod season;
pub mod snapshot;

pub use competition::CompetitionRepository;
pub use leaderboard_cache::LeaderboardCacheRepository;
pub use match_record::MatchRecordRepository;
pub use participant::ParticipantRepository;
pub use season::SeasonRepository;
pub use snapshot::SnapshotRepository;

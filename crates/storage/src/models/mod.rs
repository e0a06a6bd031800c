pub mod competition;
pub mod criteria;
pub mod leaderboard_cache;
pub mod match_record;
pub mod participant;
pub mod rank;
pub mod season;
pub mod snapshot;

pub use competition::{Competition, Visibility};
pub use criteria::{Criteria, GameQueue, RankedQueue};
pub use leaderboard_cache::CachedLeaderboard;
pub use match_record::MatchRecord;
pub use participant::{LinkedAccount, Participant, ParticipantStatus, RosterMember};
pub use rank::{Division, RankValue, Tier};
pub use season::Season;
pub use snapshot::{RankSnapshot, SnapshotKind};

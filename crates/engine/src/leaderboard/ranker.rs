use crate::leaderboard::{LeaderboardEntry, RankedLeaderboardEntry};

/// Competition ranking with gaps over a stable descending sort of the
/// comparable score projection: tied entries keep the previous entry's
/// rank, a non-tied entry takes its 1-based position. `[100, 80, 80, 60]`
/// ranks as `[1, 2, 2, 4]`.
pub fn assign_ranks(mut entries: Vec<LeaderboardEntry>) -> Vec<RankedLeaderboardEntry> {
    // Stable: equal keys keep their pre-sort (roster) order.
    entries.sort_by(|a, b| b.score.sort_key().cmp(&a.score.sort_key()));

    let mut standings = Vec::with_capacity(entries.len());
    let mut previous_key = None;
    let mut previous_rank = 0u32;

    for (position, entry) in entries.into_iter().enumerate() {
        let key = entry.score.sort_key();
        let rank = match previous_key {
            Some(previous) if previous == key => previous_rank,
            _ => position as u32 + 1,
        };
        previous_key = Some(key);
        previous_rank = rank;
        standings.push(RankedLeaderboardEntry { rank, entry });
    }

    standings
}

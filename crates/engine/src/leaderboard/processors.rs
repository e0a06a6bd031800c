use std::collections::HashMap;

use rust_decimal::Decimal;
use storage::models::{Criteria, GameQueue, MatchRecord, RosterMember};
use uuid::Uuid;

use crate::leaderboard::{EntryStats, LeaderboardEntry, Score, SnapshotBundle};

/// Scores a roster under one criteria. Entries come back unranked, in
/// roster (participant-id) order, so the ranker's stable sort keeps output
/// deterministic.
pub fn score_entries(
    criteria: &Criteria,
    roster: &[RosterMember],
    records: &[MatchRecord],
    bundle: Option<&SnapshotBundle>,
) -> Vec<LeaderboardEntry> {
    match criteria {
        Criteria::MostGamesPlayed { queue } => {
            count_records(roster, records, |r| queue.matches(r.queue_id))
        }
        Criteria::MostWinsPlayer { queue } => {
            count_records(roster, records, |r| r.win && queue.matches(r.queue_id))
        }
        Criteria::MostWinsChampion { champion_id, queue } => {
            count_records(roster, records, |r| {
                r.win
                    && r.champion_id == *champion_id
                    && queue.is_none_or(|q| q.matches(r.queue_id))
            })
        }
        Criteria::HighestWinRate { queue, min_games } => {
            win_rates(roster, records, *queue, *min_games)
        }
        Criteria::HighestRank { .. } => {
            let Some(bundle) = bundle else {
                return Vec::new();
            };
            highest_rank(roster, bundle)
        }
        Criteria::MostRankClimb { .. } => {
            let Some(bundle) = bundle else {
                return Vec::new();
            };
            rank_climb(roster, bundle)
        }
    }
}

/// Maps each record to its roster member once, then counts qualifying
/// records. Members with zero qualifying records still score 0.
fn count_records(
    roster: &[RosterMember],
    records: &[MatchRecord],
    qualifies: impl Fn(&MatchRecord) -> bool,
) -> Vec<LeaderboardEntry> {
    let owner_of = puuid_index(roster);
    let mut counts: HashMap<Uuid, u32> = HashMap::new();

    for record in records {
        if let Some(&participant_id) = owner_of.get(record.puuid.as_str()) {
            if qualifies(record) {
                *counts.entry(participant_id).or_default() += 1;
            }
        }
    }

    roster
        .iter()
        .map(|member| {
            let count = counts
                .get(&member.participant_id())
                .copied()
                .unwrap_or_default();
            LeaderboardEntry {
                participant_id: member.participant_id(),
                display_name: member.participant.display_name.clone(),
                score: Score::Numeric(Decimal::from(count)),
                stats: None,
            }
        })
        .collect()
}

/// wins / games × 100, two decimal places. Members with fewer qualifying
/// games than the configured minimum are excluded entirely, not scored as
/// zero; exactly `min_games` games is enough.
fn win_rates(
    roster: &[RosterMember],
    records: &[MatchRecord],
    queue: GameQueue,
    min_games: u32,
) -> Vec<LeaderboardEntry> {
    let owner_of = puuid_index(roster);
    let mut tallies: HashMap<Uuid, EntryStats> = HashMap::new();

    for record in records {
        if let Some(&participant_id) = owner_of.get(record.puuid.as_str()) {
            if queue.matches(record.queue_id) {
                let stats = tallies.entry(participant_id).or_insert(EntryStats {
                    wins: 0,
                    games: 0,
                });
                stats.games += 1;
                if record.win {
                    stats.wins += 1;
                }
            }
        }
    }

    roster
        .iter()
        .filter_map(|member| {
            let stats = tallies.get(&member.participant_id()).copied()?;
            if stats.games < min_games {
                return None;
            }
            let rate = (Decimal::from(stats.wins) * Decimal::from(100)
                / Decimal::from(stats.games))
            .round_dp(2);
            Some(LeaderboardEntry {
                participant_id: member.participant_id(),
                display_name: member.participant.display_name.clone(),
                score: Score::Numeric(rate),
                stats: Some(stats),
            })
        })
        .collect()
}

/// The composite rank value itself is the score; reduction to a scalar is
/// the ranker's job. Members absent from the bundle cannot be scored and
/// are omitted.
fn highest_rank(roster: &[RosterMember], bundle: &SnapshotBundle) -> Vec<LeaderboardEntry> {
    roster
        .iter()
        .filter_map(|member| {
            let value = bundle.latest(member.participant_id())?;
            Some(LeaderboardEntry {
                participant_id: member.participant_id(),
                display_name: member.participant.display_name.clone(),
                score: Score::Rank(value),
                stats: None,
            })
        })
        .collect()
}

/// Climb in reduced league points since the START baseline. Members
/// lacking either side of the comparison are omitted.
fn rank_climb(roster: &[RosterMember], bundle: &SnapshotBundle) -> Vec<LeaderboardEntry> {
    roster
        .iter()
        .filter_map(|member| {
            let participant_id = member.participant_id();
            let start = bundle.start.get(&participant_id)?;
            let latest = bundle.latest(participant_id)?;
            let climb = latest.reduced_league_points() - start.reduced_league_points();
            Some(LeaderboardEntry {
                participant_id,
                display_name: member.participant.display_name.clone(),
                score: Score::Numeric(Decimal::from(climb)),
                stats: None,
            })
        })
        .collect()
}

fn puuid_index(roster: &[RosterMember]) -> HashMap<&str, Uuid> {
    let mut index = HashMap::new();
    for member in roster {
        for account in &member.accounts {
            index.insert(account.puuid.as_str(), member.participant_id());
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use chrono::{TimeZone, Utc};
    use storage::models::{Division, RankValue, Tier};

    fn at(hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, 0, 0).unwrap()
    }

    #[test]
    fn zero_activity_still_scores_zero_for_count_criteria() {
        let roster = vec![
            testing::member("alice", &["puuid-a"]),
            testing::member("bob", &["puuid-b"]),
        ];
        let records = vec![testing::record("puuid-a", 420, true, 103, at(1))];

        let entries = score_entries(
            &Criteria::MostGamesPlayed {
                queue: GameQueue::RankedSolo,
            },
            &roster,
            &records,
            None,
        );

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].score, Score::Numeric(Decimal::ONE));
        assert_eq!(entries[1].score, Score::Numeric(Decimal::ZERO));
    }

    #[test]
    fn wins_are_counted_across_all_linked_accounts() {
        let roster = vec![testing::member("alice", &["puuid-a", "puuid-smurf"])];
        let records = vec![
            testing::record("puuid-a", 420, true, 103, at(1)),
            testing::record("puuid-smurf", 420, true, 64, at(2)),
            testing::record("puuid-a", 420, false, 103, at(3)),
            testing::record("puuid-unrelated", 420, true, 103, at(4)),
        ];

        let entries = score_entries(
            &Criteria::MostWinsPlayer {
                queue: GameQueue::RankedSolo,
            },
            &roster,
            &records,
            None,
        );

        assert_eq!(entries[0].score, Score::Numeric(Decimal::from(2)));
    }

    #[test]
    fn champion_wins_respect_the_optional_queue_filter() {
        let roster = vec![testing::member("alice", &["puuid-a"])];
        let records = vec![
            testing::record("puuid-a", 420, true, 103, at(1)),
            testing::record("puuid-a", 450, true, 103, at(2)),
            testing::record("puuid-a", 420, true, 64, at(3)),
            testing::record("puuid-a", 420, false, 103, at(4)),
        ];

        let unfiltered = score_entries(
            &Criteria::MostWinsChampion {
                champion_id: 103,
                queue: None,
            },
            &roster,
            &records,
            None,
        );
        assert_eq!(unfiltered[0].score, Score::Numeric(Decimal::from(2)));

        let solo_only = score_entries(
            &Criteria::MostWinsChampion {
                champion_id: 103,
                queue: Some(GameQueue::RankedSolo),
            },
            &roster,
            &records,
            None,
        );
        assert_eq!(solo_only[0].score, Score::Numeric(Decimal::ONE));
    }

    #[test]
    fn win_rate_threshold_excludes_below_and_keeps_exactly_at() {
        let roster = vec![
            testing::member("alice", &["puuid-a"]),
            testing::member("bob", &["puuid-b"]),
        ];
        let mut records = Vec::new();
        // Alice: 10 games, 7 wins. Bob: 9 games, 9 wins.
        for i in 0..10 {
            records.push(testing::record("puuid-a", 420, i < 7, 103, at(i as u32)));
        }
        for i in 0..9 {
            records.push(testing::record("puuid-b", 420, true, 64, at(i as u32)));
        }

        let entries = score_entries(
            &Criteria::HighestWinRate {
                queue: GameQueue::RankedSolo,
                min_games: 10,
            },
            &roster,
            &records,
            None,
        );

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "alice");
        assert_eq!(
            entries[0].score,
            Score::Numeric(Decimal::new(7000, 2)) // 70.00
        );
        assert_eq!(entries[0].stats, Some(EntryStats { wins: 7, games: 10 }));
    }

    #[test]
    fn highest_rank_keeps_the_composite_value() {
        let alice = testing::member("alice", &["puuid-a"]);
        let bob = testing::member("bob", &["puuid-b"]);
        let mut bundle = SnapshotBundle::default();
        let value = RankValue::new(Tier::Emerald, Division::III, 55);
        bundle.current.insert(alice.participant_id(), value);
        let roster = vec![alice, bob];

        let entries = score_entries(
            &Criteria::HighestRank {
                queue: storage::models::RankedQueue::Solo,
            },
            &roster,
            &[],
            Some(&bundle),
        );

        // Bob is absent from the bundle and therefore omitted.
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, Score::Rank(value));
    }

    #[test]
    fn climb_prefers_end_snapshot_over_live_rank() {
        let alice = testing::member("alice", &["puuid-a"]);
        let mut bundle = SnapshotBundle::default();
        bundle.start.insert(
            alice.participant_id(),
            RankValue::new(Tier::Gold, Division::IV, 20),
        );
        bundle.end.insert(
            alice.participant_id(),
            RankValue::new(Tier::Gold, Division::II, 10),
        );
        bundle.current.insert(
            alice.participant_id(),
            RankValue::new(Tier::Challenger, Division::I, 500),
        );
        let roster = vec![alice];

        let entries = score_entries(
            &Criteria::MostRankClimb {
                queue: storage::models::RankedQueue::Solo,
            },
            &roster,
            &[],
            Some(&bundle),
        );

        assert_eq!(entries[0].score, Score::Numeric(Decimal::from(190)));
    }
}

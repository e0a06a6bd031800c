use serde::{Deserialize, Serialize};

/// One division step on the ranked ladder, in reduced league points.
pub const DIVISION_STEP: i32 = 100;
/// One tier step (four divisions).
pub const TIER_STEP: i32 = 400;

/// Ranked tier, low to high. `Unranked` reduces below every ranked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Unranked,
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Unranked => "UNRANKED",
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Emerald => "EMERALD",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
        }
    }

    pub fn parse(s: &str) -> Option<Tier> {
        let tier = match s {
            "UNRANKED" => Tier::Unranked,
            "IRON" => Tier::Iron,
            "BRONZE" => Tier::Bronze,
            "SILVER" => Tier::Silver,
            "GOLD" => Tier::Gold,
            "PLATINUM" => Tier::Platinum,
            "EMERALD" => Tier::Emerald,
            "DIAMOND" => Tier::Diamond,
            "MASTER" => Tier::Master,
            "GRANDMASTER" => Tier::Grandmaster,
            "CHALLENGER" => Tier::Challenger,
            _ => return None,
        };
        Some(tier)
    }

    /// 0 for `Unranked`, 1..=10 for the ranked tiers.
    fn index(&self) -> i32 {
        match self {
            Tier::Unranked => 0,
            Tier::Iron => 1,
            Tier::Bronze => 2,
            Tier::Silver => 3,
            Tier::Gold => 4,
            Tier::Platinum => 5,
            Tier::Emerald => 6,
            Tier::Diamond => 7,
            Tier::Master => 8,
            Tier::Grandmaster => 9,
            Tier::Challenger => 10,
        }
    }
}

/// Division within a tier. Apex tiers (Master and above) report `I`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Division {
    IV,
    III,
    II,
    I,
}

impl Division {
    pub fn as_str(&self) -> &'static str {
        match self {
            Division::IV => "IV",
            Division::III => "III",
            Division::II => "II",
            Division::I => "I",
        }
    }

    pub fn parse(s: &str) -> Option<Division> {
        let division = match s {
            "IV" => Division::IV,
            "III" => Division::III,
            "II" => Division::II,
            "I" => Division::I,
            _ => return None,
        };
        Some(division)
    }

    fn index(&self) -> i32 {
        match self {
            Division::IV => 0,
            Division::III => 1,
            Division::II => 2,
            Division::I => 3,
        }
    }
}

/// Composite ranked standing: tier + division + league points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankValue {
    pub tier: Tier,
    pub division: Division,
    pub league_points: i32,
}

impl RankValue {
    pub const UNRANKED: RankValue = RankValue {
        tier: Tier::Unranked,
        division: Division::IV,
        league_points: 0,
    };

    pub fn new(tier: Tier, division: Division, league_points: i32) -> Self {
        Self {
            tier,
            division,
            league_points,
        }
    }

    /// Reduces the composite value to a single comparable integer.
    ///
    /// A division step is worth 100 points and a tier step 400, so any climb
    /// across a division boundary outranks any climb within one division.
    /// `Unranked` reduces to 0, below every ranked value; apex-tier league
    /// points above 100 keep accumulating past the division slots.
    pub fn reduced_league_points(&self) -> i32 {
        if self.tier == Tier::Unranked {
            return 0;
        }
        self.tier.index() * TIER_STEP + self.division.index() * DIVISION_STEP + self.league_points
    }

    pub fn is_unranked(&self) -> bool {
        self.tier == Tier::Unranked
    }
}

impl std::fmt::Display for RankValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unranked() {
            write!(f, "Unranked")
        } else if self.tier >= Tier::Master {
            write!(f, "{} {} LP", self.tier.as_str(), self.league_points)
        } else {
            write!(
                f,
                "{} {} {} LP",
                self.tier.as_str(),
                self.division.as_str(),
                self.league_points
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(tier: Tier, division: Division, lp: i32) -> RankValue {
        RankValue::new(tier, division, lp)
    }

    #[test]
    fn unranked_reduces_below_every_ranked_value() {
        let iron_floor = rank(Tier::Iron, Division::IV, 0);
        assert!(RankValue::UNRANKED.reduced_league_points() < iron_floor.reduced_league_points());
    }

    #[test]
    fn reduction_is_monotonic_across_the_ladder() {
        let ladder = [
            rank(Tier::Iron, Division::IV, 0),
            rank(Tier::Iron, Division::IV, 99),
            rank(Tier::Iron, Division::III, 0),
            rank(Tier::Silver, Division::I, 75),
            rank(Tier::Gold, Division::IV, 0),
            rank(Tier::Gold, Division::II, 10),
            rank(Tier::Diamond, Division::I, 99),
            rank(Tier::Master, Division::I, 0),
            rank(Tier::Grandmaster, Division::I, 450),
            rank(Tier::Challenger, Division::I, 1200),
        ];
        for pair in ladder.windows(2) {
            assert!(
                pair[0].reduced_league_points() < pair[1].reduced_league_points(),
                "{} should reduce below {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn division_advance_dominates_in_division_lp() {
        // Gold IV 20 LP -> Gold II 10 LP: two divisions up, 10 LP down.
        let start = rank(Tier::Gold, Division::IV, 20);
        let end = rank(Tier::Gold, Division::II, 10);
        let climb = end.reduced_league_points() - start.reduced_league_points();
        assert_eq!(climb, 190);
        assert!(climb > 50);
    }

    #[test]
    fn tier_and_division_strings_round_trip() {
        for tier in [
            Tier::Unranked,
            Tier::Iron,
            Tier::Gold,
            Tier::Emerald,
            Tier::Challenger,
        ] {
            assert_eq!(Tier::parse(tier.as_str()), Some(tier));
        }
        for division in [Division::IV, Division::III, Division::II, Division::I] {
            assert_eq!(Division::parse(division.as_str()), Some(division));
        }
        assert_eq!(Tier::parse("WOOD"), None);
        assert_eq!(Division::parse("V"), None);
    }
}

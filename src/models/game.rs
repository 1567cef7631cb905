//! Teams, pair keys, live matches and finished match records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result text stored when a match is finished without one.
pub const NO_RESULT: &str = "no record";

/// Two teammates. Order is only kept for display; pair history ignores it.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Team(pub [String; 2]);

impl Team {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self([a.into(), b.into()])
    }

    pub fn members(&self) -> &[String; 2] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|p| p == name)
    }

    /// Key of the two teammates, for partner history.
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.0[0], &self.0[1])
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}&{}", self.0[0], self.0[1])
    }
}

/// Order-independent key for two distinct participants.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        debug_assert_ne!(a, b, "pair key needs two distinct participants");
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }
}

/// The match currently running in a slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActiveMatch {
    pub slot_id: u32,
    pub team_a: Team,
    pub team_b: Team,
    pub started_at: DateTime<Utc>,
}

impl ActiveMatch {
    pub fn new(slot_id: u32, team_a: Team, team_b: Team) -> Self {
        Self {
            slot_id,
            team_a,
            team_b,
            started_at: Utc::now(),
        }
    }

    /// All four participants, team A first.
    pub fn players(&self) -> impl Iterator<Item = &String> {
        self.team_a.0.iter().chain(self.team_b.0.iter())
    }

    pub fn involves(&self, name: &str) -> bool {
        self.team_a.contains(name) || self.team_b.contains(name)
    }
}

/// A finished match. Immutable once appended to the session history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Sequential, starting at 1.
    pub id: u64,
    pub slot_id: u32,
    pub team_a: Team,
    pub team_b: Team,
    /// Free text, or [`NO_RESULT`] when none was given.
    pub result: String,
    pub finished_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn from_active(id: u64, m: ActiveMatch, result: &str) -> Self {
        let result = result.trim();
        Self {
            id,
            slot_id: m.slot_id,
            team_a: m.team_a,
            team_b: m.team_b,
            result: if result.is_empty() {
                NO_RESULT.to_string()
            } else {
                result.to_string()
            },
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_ignores_order() {
        assert_eq!(PairKey::new("Ann", "Bo"), PairKey::new("Bo", "Ann"));
        assert_eq!(Team::new("Bo", "Ann").pair_key(), PairKey::new("Ann", "Bo"));
    }

    #[test]
    fn blank_result_becomes_sentinel() {
        let m = ActiveMatch::new(1, Team::new("a", "b"), Team::new("c", "d"));
        let rec = MatchRecord::from_active(1, m, "  ");
        assert_eq!(rec.result, NO_RESULT);
        assert_eq!(rec.team_a.to_string(), "a&b");
    }
}

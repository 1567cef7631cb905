//! HistoryLedger: partner/opponent counters used as the matching cost.

use crate::models::game::{PairKey, Team};
use std::collections::HashMap;

/// Pairwise counters accumulated from finished matches. Never decremented.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HistoryLedger {
    partner_count: HashMap<PairKey, u32>,
    opponent_count: HashMap<PairKey, u32>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times `a` and `b` were teammates.
    pub fn partner_cost(&self, a: &str, b: &str) -> u32 {
        self.partner_count
            .get(&PairKey::new(a, b))
            .copied()
            .unwrap_or(0)
    }

    /// Times `a` and `b` faced each other.
    pub fn opponent_cost(&self, a: &str, b: &str) -> u32 {
        self.opponent_count
            .get(&PairKey::new(a, b))
            .copied()
            .unwrap_or(0)
    }

    /// One partnership per team, four cross-team oppositions.
    pub fn record_match(&mut self, team_a: &Team, team_b: &Team) {
        *self.partner_count.entry(team_a.pair_key()).or_insert(0) += 1;
        *self.partner_count.entry(team_b.pair_key()).or_insert(0) += 1;
        for a in team_a.members() {
            for b in team_b.members() {
                *self.opponent_count.entry(PairKey::new(a, b)).or_insert(0) += 1;
            }
        }
    }

    /// Seed a partner count directly (used to replay known history).
    pub fn add_partnership(&mut self, a: &str, b: &str, times: u32) {
        *self.partner_count.entry(PairKey::new(a, b)).or_insert(0) += times;
    }

    /// Seed an opponent count directly (used to replay known history).
    pub fn add_opposition(&mut self, a: &str, b: &str, times: u32) {
        *self.opponent_count.entry(PairKey::new(a, b)).or_insert(0) += times;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_match_counts_partners_and_cross_pairs() {
        let mut ledger = HistoryLedger::new();
        let a = Team::new("A", "B");
        let b = Team::new("C", "D");
        ledger.record_match(&a, &b);
        ledger.record_match(&Team::new("B", "A"), &Team::new("C", "E"));

        assert_eq!(ledger.partner_cost("A", "B"), 2);
        assert_eq!(ledger.partner_cost("D", "C"), 1);
        assert_eq!(ledger.partner_cost("C", "E"), 1);
        assert_eq!(ledger.opponent_cost("A", "C"), 2);
        assert_eq!(ledger.opponent_cost("D", "B"), 1);
        assert_eq!(ledger.opponent_cost("E", "A"), 1);
        // Teammates are never opponents of each other.
        assert_eq!(ledger.opponent_cost("A", "B"), 0);
        assert_eq!(ledger.partner_cost("A", "C"), 0);
    }
}

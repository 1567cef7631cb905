//! Rotation: filling idle slots with the most rested participants and finishing matches.

use crate::models::{
    ActiveMatch, HistoryLedger, MatchRecord, RotationError, Roster, Session, Team,
};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

/// Participants per match (2v2).
pub const MATCH_SIZE: usize = 4;

/// Weight of one repeated partnership against one repeated opposition.
/// Opponent cost per split stays far below this in any realistic session,
/// so avoiding a repeat partner always wins.
pub const PARTNER_REPEAT_WEIGHT: u64 = 1000;

/// The three ways to split four people into two teams of two, as index quadruples
/// `[a0, a1, b0, b1]` into the priority-sorted group.
const SPLITS: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// One line of a fill pass.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum FillLogEntry {
    /// No slot was idle; nothing changed.
    NothingToDo,
    Assigned {
        slot_id: u32,
        team_a: Team,
        team_b: Team,
    },
    /// The slot stays idle this round.
    Skipped { slot_id: u32, reason: RotationError },
}

impl fmt::Display for FillLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillLogEntry::NothingToDo => write!(f, "No idle slots to fill"),
            FillLogEntry::Assigned {
                slot_id,
                team_a,
                team_b,
            } => write!(f, "Slot {}: {} vs {}", slot_id, team_a, team_b),
            FillLogEntry::Skipped { reason, .. } => write!(f, "{}", reason),
        }
    }
}

/// A candidate team split and its weighted history cost.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Split {
    pub team_a: Team,
    pub team_b: Team,
    pub cost: u64,
}

/// Fill every idle slot, in ascending id order, then run the end-of-round rest update.
///
/// 1. No idle slot: return a single [`FillLogEntry::NothingToDo`] and touch nothing.
/// 2. Per slot: skip if fewer than 4 participants are available, otherwise pick the 4 with
///    the longest rest (fewest plays on equal rest, random among exact ties) and place the
///    cheapest of the three team splits.
/// 3. Every registered participant then gets rest reset (busy) or incremented (waiting),
///    once per call no matter how many slots were filled.
pub fn fill_idle_slots(session: &mut Session) -> Vec<FillLogEntry> {
    let idle = session.board.idle_slot_ids();
    if idle.is_empty() {
        debug!("Session {}: no idle slots", session.id);
        return vec![FillLogEntry::NothingToDo];
    }

    session.round += 1;
    let mut log = Vec::with_capacity(idle.len());
    for slot_id in idle {
        match fill_slot(session, slot_id) {
            Ok(split) => {
                info!(
                    "Session {} round {}: slot {} {} vs {} (cost {})",
                    session.id, session.round, slot_id, split.team_a, split.team_b, split.cost
                );
                log.push(FillLogEntry::Assigned {
                    slot_id,
                    team_a: split.team_a,
                    team_b: split.team_b,
                });
            }
            Err(reason) => {
                warn!("Session {}: {}", session.id, reason);
                log.push(FillLogEntry::Skipped { slot_id, reason });
            }
        }
    }

    for p in session.roster.all_mut() {
        p.record_round();
    }
    log
}

/// Place one match on `slot_id`, or report why the slot stays idle.
fn fill_slot(session: &mut Session, slot_id: u32) -> Result<Split, RotationError> {
    let available = session.roster.available().len();
    if available < MATCH_SIZE {
        return Err(RotationError::InsufficientAvailablePlayers { slot_id, available });
    }

    let group = select_candidates(&session.roster, &mut session.rng);
    let group: [String; MATCH_SIZE] = match group.try_into() {
        Ok(group) => group,
        Err(short) => {
            return Err(RotationError::InsufficientAvailablePlayers {
                slot_id,
                available: short.len(),
            })
        }
    };
    let split = best_split(&session.ledger, &group);

    for name in split.team_a.members().iter().chain(split.team_b.members()) {
        if let Some(p) = session.roster.get_mut(name) {
            p.start_playing();
        }
    }
    session.board.assign(
        slot_id,
        ActiveMatch::new(slot_id, split.team_a.clone(), split.team_b.clone()),
    );
    Ok(split)
}

/// Up to four available participants by priority: longest consecutive rest first, then fewest
/// plays. The pool is shuffled before the stable sort so exact ties resolve at random.
pub fn select_candidates<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> Vec<String> {
    let mut pool = roster.available();
    pool.shuffle(rng);
    pool.sort_by_key(|p| (Reverse(p.rest_priority()), p.play_count));
    let group: Vec<String> = pool
        .into_iter()
        .take(MATCH_SIZE)
        .map(|p| p.name.clone())
        .collect();
    debug!("Candidates by priority: {:?}", group);
    group
}

/// `1000 × repeated partnerships + Σ cross-team repeated oppositions`.
pub fn split_cost(ledger: &HistoryLedger, team_a: &Team, team_b: &Team) -> u64 {
    let [a0, a1] = team_a.members();
    let [b0, b1] = team_b.members();
    let partner = u64::from(ledger.partner_cost(a0, a1)) + u64::from(ledger.partner_cost(b0, b1));
    let opponent: u64 = team_a
        .members()
        .iter()
        .flat_map(|a| {
            team_b
                .members()
                .iter()
                .map(move |b| u64::from(ledger.opponent_cost(a, b)))
        })
        .sum();
    PARTNER_REPEAT_WEIGHT * partner + opponent
}

/// Cheapest of the three splits of `group`; on equal cost the earlier split wins
/// (`01|23`, then `02|13`, then `03|12`).
pub fn best_split(ledger: &HistoryLedger, group: &[String; MATCH_SIZE]) -> Split {
    let [first, second, third] = SPLITS.map(|[a0, a1, b0, b1]| {
        let team_a = Team::new(group[a0].as_str(), group[a1].as_str());
        let team_b = Team::new(group[b0].as_str(), group[b1].as_str());
        let cost = split_cost(ledger, &team_a, &team_b);
        debug!("Split {} vs {}: cost {}", team_a, team_b, cost);
        Split {
            team_a,
            team_b,
            cost,
        }
    });
    [second, third]
        .into_iter()
        .fold(first, |best, s| if s.cost < best.cost { s } else { best })
}

/// Finish the match on `slot_id`: record it, update pair history, free the four players,
/// and idle the slot (or drop it if it is closing). False if nothing was running there.
pub fn finish_match(session: &mut Session, slot_id: u32, result: &str) -> bool {
    try_finish_match(session, slot_id, result).is_ok()
}

/// Like [`finish_match`] but returns the new history record or why nothing happened.
pub fn try_finish_match(
    session: &mut Session,
    slot_id: u32,
    result: &str,
) -> Result<MatchRecord, RotationError> {
    let active = session
        .board
        .clear(slot_id)
        .ok_or(RotationError::NoActiveMatchAtSlot { slot_id })?;

    session.ledger.record_match(&active.team_a, &active.team_b);
    for name in active.players() {
        if let Some(p) = session.roster.get_mut(name) {
            p.release();
        }
    }

    let record = MatchRecord::from_active(session.history.len() as u64 + 1, active, result);
    info!(
        "Session {}: slot {} finished, {} vs {} ({})",
        session.id, slot_id, record.team_a, record.team_b, record.result
    );
    session.history.push(record.clone());
    Ok(record)
}

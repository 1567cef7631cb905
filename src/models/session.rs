//! Session: the whole mutable state of one rotation (roster, pair history, slots, match log).

use crate::models::board::{SlotBoard, SlotView};
use crate::models::game::MatchRecord;
use crate::models::ledger::HistoryLedger;
use crate::models::participant::{Participant, Roster};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Default number of slots for a fresh session.
pub const DEFAULT_SLOT_COUNT: u32 = 2;

/// Errors returned by session operations.
#[derive(Clone, Debug, Eq, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RotationError {
    #[error("Name must not be empty")]
    InvalidName { name: String },
    #[error("{name} is already on the list")]
    DuplicateName { name: String },
    #[error("{name} is not on the list")]
    NotFound { name: String },
    #[error("{name} is playing on slot {slot_id}; finish that match first")]
    StillBusy { name: String, slot_id: u32 },
    #[error("No active match on slot {slot_id}")]
    NoActiveMatchAtSlot { slot_id: u32 },
    /// Informational: the slot stays idle this round.
    #[error("Slot {slot_id}: only {available} participant(s) available, need 4")]
    InsufficientAvailablePlayers { slot_id: u32, available: usize },
}

/// Settings for a new session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_slot_count")]
    pub slot_count: u32,
    /// Seed for the tie-break shuffle. None seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_slot_count() -> u32 {
    DEFAULT_SLOT_COUNT
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            seed: None,
        }
    }
}

/// Full rotation state. Owned by the caller and passed by `&mut` into every operation.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub(crate) roster: Roster,
    pub(crate) ledger: HistoryLedger,
    pub(crate) board: SlotBoard,
    pub(crate) history: Vec<MatchRecord>,
    /// Fill passes that had at least one idle slot to consider.
    pub(crate) round: u64,
    pub(crate) rng: StdRng,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config.slot_count, rng)
    }

    /// Session with an explicit tie-break source.
    pub fn with_rng(slot_count: u32, rng: StdRng) -> Self {
        Self {
            id: Uuid::new_v4(),
            roster: Roster::new(),
            ledger: HistoryLedger::new(),
            board: SlotBoard::new(slot_count),
            history: Vec::new(),
            round: 0,
            rng,
        }
    }

    /// Seeded session, handy for reproducible runs.
    pub fn seeded(slot_count: u32, seed: u64) -> Self {
        Self::with_rng(slot_count, StdRng::seed_from_u64(seed))
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// Mutable pair history, e.g. to carry counts over from an earlier session.
    pub fn ledger_mut(&mut self) -> &mut HistoryLedger {
        &mut self.ledger
    }

    pub fn board(&self) -> &SlotBoard {
        &self.board
    }

    /// Finished matches, oldest first.
    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Non-removed participant by name.
    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.roster.get(name)
    }

    /// Add a participant to the waiting pool.
    pub fn register(&mut self, name: &str) -> Result<(), RotationError> {
        self.roster.register(name)?;
        log::info!("Session {}: registered {}", self.id, name.trim());
        Ok(())
    }

    /// Take a participant out of future rotations. Fails while they are on a slot.
    pub fn remove(&mut self, name: &str) -> Result<(), RotationError> {
        let name = name.trim();
        if let Some(slot_id) = self.board.slot_of(name) {
            return Err(RotationError::StillBusy {
                name: name.to_string(),
                slot_id,
            });
        }
        self.roster.remove(name)?;
        log::info!("Session {}: removed {} (stats kept)", self.id, name);
        Ok(())
    }

    /// Change the number of slots. Values below 1 are ignored.
    pub fn set_slot_count(&mut self, count: u32) {
        if count < 1 {
            log::debug!("Session {}: ignoring slot count {}", self.id, count);
            return;
        }
        self.board.resize(count);
        log::info!(
            "Session {}: {} slot(s), closing {:?}",
            self.id,
            count,
            self.board.closing_slot_ids()
        );
    }

    /// Participants waiting for a slot (not busy, not removed).
    pub fn available_participants(&self) -> Vec<&Participant> {
        self.roster.available()
    }

    /// Snapshot for API responses.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            round: self.round,
            slot_count: self.board.slot_count(),
            slots: self.board.views(),
            waiting: self.roster.available().into_iter().cloned().collect(),
            participants: self.roster.all().to_vec(),
            history: self.history.clone(),
        }
    }
}

/// Serializable view of a session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub round: u64,
    pub slot_count: u32,
    pub slots: Vec<SlotView>,
    /// Waiting list (available participants).
    pub waiting: Vec<Participant>,
    /// Everyone ever registered, removed included.
    pub participants: Vec<Participant>,
    pub history: Vec<MatchRecord>,
}

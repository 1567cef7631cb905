//! Data structures for court rotation: participants, slots, pair history, session state.

mod board;
mod game;
mod ledger;
mod participant;
mod session;

pub use board::{SlotBoard, SlotView};
pub use game::{ActiveMatch, MatchRecord, PairKey, Team, NO_RESULT};
pub use ledger::HistoryLedger;
pub use participant::{Participant, ParticipantStatus, Roster};
pub use session::{
    RotationError, Session, SessionConfig, SessionId, SessionSnapshot, DEFAULT_SLOT_COUNT,
};

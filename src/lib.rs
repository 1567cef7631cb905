//! Court rotation web app: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    best_split, export_match_history, export_participant_stats, fill_idle_slots, finish_match,
    generate_text_summary, history_csv, select_candidates, split_cost, stats_csv,
    try_finish_match, ExportError, FillLogEntry, HistoryRow, Split, StatsRow,
};
pub use models::{
    ActiveMatch, HistoryLedger, MatchRecord, PairKey, Participant, ParticipantStatus,
    RotationError, Roster, Session, SessionConfig, SessionId, SessionSnapshot, SlotBoard,
    SlotView, Team,
};

//! Rotation business logic: filling slots, finishing matches, exports.

mod export;
mod scheduler;

pub use export::{
    export_match_history, export_participant_stats, generate_text_summary, history_csv,
    stats_csv, summary_from_rows, ExportError, HistoryRow, StatsRow, EMPTY_SUMMARY,
    REMOVED_SUFFIX,
};
pub use scheduler::{
    best_split, fill_idle_slots, finish_match, select_candidates, split_cost, try_finish_match,
    FillLogEntry, Split, MATCH_SIZE, PARTNER_REPEAT_WEIGHT,
};

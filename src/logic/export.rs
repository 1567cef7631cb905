//! Exports: match history and participant stats as rows, CSV, and a plain-text summary.

use crate::models::Session;
use serde::Serialize;
use std::cmp::Reverse;
use thiserror::Error;

/// Appended to the name of participants who left the session.
pub const REMOVED_SUFFIX: &str = " (left)";

/// Summary text when no match has finished yet.
pub const EMPTY_SUMMARY: &str = "No matches recorded yet";

const HISTORY_HEADERS: [&str; 3] = ["team_a", "team_b", "result"];
const STATS_HEADERS: [&str; 3] = ["name", "play_count", "consecutive_rest"];

/// Errors while rendering CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// One finished match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HistoryRow {
    pub team_a: String,
    pub team_b: String,
    pub result: String,
}

/// One participant. `consecutive_rest` is absent for participants who left.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StatsRow {
    pub name: String,
    pub play_count: u32,
    pub consecutive_rest: Option<u32>,
}

/// Finished matches, oldest first.
pub fn export_match_history(session: &Session) -> Vec<HistoryRow> {
    session
        .history()
        .iter()
        .map(|m| HistoryRow {
            team_a: m.team_a.to_string(),
            team_b: m.team_b.to_string(),
            result: m.result.clone(),
        })
        .collect()
}

/// Everyone ever registered, most plays first (registration order on ties).
pub fn export_participant_stats(session: &Session) -> Vec<StatsRow> {
    let mut rows: Vec<StatsRow> = session
        .roster()
        .all()
        .iter()
        .map(|p| StatsRow {
            name: if p.is_removed() {
                format!("{}{}", p.name, REMOVED_SUFFIX)
            } else {
                p.name.clone()
            },
            play_count: p.play_count,
            consecutive_rest: p.consecutive_rest,
        })
        .collect();
    rows.sort_by_key(|r| Reverse(r.play_count));
    rows
}

pub fn history_csv(rows: &[HistoryRow]) -> Result<String, ExportError> {
    write_csv(&HISTORY_HEADERS, rows)
}

pub fn stats_csv(rows: &[StatsRow]) -> Result<String, ExportError> {
    write_csv(&STATS_HEADERS, rows)
}

/// Header row always present, even with no data rows.
fn write_csv<T: Serialize>(headers: &[&str], rows: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Human-readable report built only from the two exports, so it is deterministic.
pub fn generate_text_summary(session: &Session) -> String {
    summary_from_rows(
        &export_match_history(session),
        &export_participant_stats(session),
    )
}

pub fn summary_from_rows(history: &[HistoryRow], stats: &[StatsRow]) -> String {
    if history.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }
    let mut out = String::from("Match report\n");
    out.push_str(&"=".repeat(20));
    out.push('\n');
    for (i, m) in history.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} vs {} ({})\n",
            i + 1,
            m.team_a,
            m.team_b,
            m.result
        ));
    }
    out.push_str("\nAppearances:\n");
    for s in stats {
        let unit = if s.play_count == 1 { "match" } else { "matches" };
        out.push_str(&format!("{}: {} {}\n", s.name, s.play_count, unit));
    }
    out
}

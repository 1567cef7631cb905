//! Participant, ParticipantStatus and the Roster that owns them.

use crate::models::session::RotationError;
use serde::{Deserialize, Serialize};

/// Lifecycle of a participant within a session.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    /// Registered and waiting for a slot.
    #[default]
    Available,
    /// Playing in an active match.
    Busy,
    /// Left the session; kept only for reporting.
    Removed,
}

/// A person eligible to be scheduled into matches.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Trimmed, unique among non-removed participants. Also the identity used in pair history.
    pub name: String,
    /// Times placed into a match. Never decreases, survives removal.
    pub play_count: u32,
    /// Rounds spent available but not placed since last playing. `None` once removed.
    pub consecutive_rest: Option<u32>,
    pub status: ParticipantStatus,
}

impl Participant {
    /// Create a new participant with the given (already trimmed) name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            play_count: 0,
            consecutive_rest: Some(0),
            status: ParticipantStatus::Available,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.status == ParticipantStatus::Removed
    }

    pub fn is_available(&self) -> bool {
        self.status == ParticipantStatus::Available
    }

    pub fn is_busy(&self) -> bool {
        self.status == ParticipantStatus::Busy
    }

    /// Rest count used for priority. Removed participants report 0.
    pub fn rest_priority(&self) -> u32 {
        self.consecutive_rest.unwrap_or(0)
    }

    /// Placed into a match: Busy, one more play.
    pub fn start_playing(&mut self) {
        self.status = ParticipantStatus::Busy;
        self.play_count += 1;
    }

    /// Match finished: back to the waiting pool. Counters untouched.
    pub fn release(&mut self) {
        if self.status == ParticipantStatus::Busy {
            self.status = ParticipantStatus::Available;
        }
    }

    /// End-of-round bookkeeping for registered participants.
    pub fn record_round(&mut self) {
        match self.status {
            ParticipantStatus::Busy => self.consecutive_rest = Some(0),
            ParticipantStatus::Available => {
                self.consecutive_rest = Some(self.consecutive_rest.unwrap_or(0) + 1)
            }
            ParticipantStatus::Removed => {}
        }
    }
}

/// All participants ever registered in a session, in registration order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant. Names are trimmed and compared case-sensitively against
    /// non-removed participants. A removed name comes back as the same participant,
    /// keeping its play count.
    pub fn register(&mut self, name: &str) -> Result<(), RotationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RotationError::InvalidName {
                name: name.to_string(),
            });
        }
        match self.participants.iter_mut().find(|p| p.name == name) {
            Some(p) if !p.is_removed() => Err(RotationError::DuplicateName {
                name: name.to_string(),
            }),
            Some(p) => {
                p.status = ParticipantStatus::Available;
                p.consecutive_rest = Some(0);
                Ok(())
            }
            None => {
                self.participants.push(Participant::new(name));
                Ok(())
            }
        }
    }

    /// Mark a participant as removed. The caller has already checked they are not on a slot.
    pub(crate) fn remove(&mut self, name: &str) -> Result<(), RotationError> {
        let name = name.trim();
        let p = self
            .participants
            .iter_mut()
            .find(|p| p.name == name && !p.is_removed())
            .ok_or_else(|| RotationError::NotFound {
                name: name.to_string(),
            })?;
        debug_assert!(!p.is_busy(), "{} removed while on a slot", name);
        p.status = ParticipantStatus::Removed;
        p.consecutive_rest = None;
        Ok(())
    }

    /// Non-removed, non-busy participants in registration order.
    pub fn available(&self) -> Vec<&Participant> {
        self.participants.iter().filter(|p| p.is_available()).collect()
    }

    /// Non-removed participant by name.
    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.name == name && !p.is_removed())
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| p.name == name && !p.is_removed())
    }

    /// Every participant ever registered, removed ones included.
    pub fn all(&self) -> &[Participant] {
        &self.participants
    }

    pub(crate) fn all_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.participants.iter_mut()
    }

    pub fn total_play_count(&self) -> u64 {
        self.participants.iter().map(|p| u64::from(p.play_count)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_resets_busy_and_counts_waiting() {
        let mut busy = Participant::new("a");
        busy.consecutive_rest = Some(3);
        busy.start_playing();
        busy.record_round();
        assert_eq!(busy.consecutive_rest, Some(0));
        assert_eq!(busy.play_count, 1);

        let mut waiting = Participant::new("b");
        waiting.record_round();
        waiting.record_round();
        assert_eq!(waiting.consecutive_rest, Some(2));
    }

    #[test]
    fn removed_participant_is_not_touched_by_rounds() {
        let mut roster = Roster::new();
        roster.register("a").unwrap();
        roster.remove("a").unwrap();
        for p in roster.all_mut() {
            p.record_round();
        }
        assert_eq!(roster.all()[0].consecutive_rest, None);
    }

    #[test]
    fn register_trims_and_rejects_blank() {
        let mut roster = Roster::new();
        assert!(matches!(
            roster.register("   "),
            Err(RotationError::InvalidName { .. })
        ));
        roster.register("  Mei ").unwrap();
        assert!(roster.get("Mei").is_some());
        // Case-sensitive: a differently cased name is a different participant.
        roster.register("mei").unwrap();
        assert_eq!(roster.all().len(), 2);
    }
}

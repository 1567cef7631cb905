//! SlotBoard: the activity slots (courts) and what is running on them.

use crate::models::game::ActiveMatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-slot view for the UI.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    pub slot_id: u32,
    /// Above the configured count; finishing its match, then dropped.
    pub closing: bool,
    /// None when idle.
    pub active: Option<ActiveMatch>,
}

/// Slots `1..=slot_count`, plus "closing" slots above that range that still run a match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotBoard {
    slot_count: u32,
    slots: BTreeMap<u32, Option<ActiveMatch>>,
}

impl SlotBoard {
    /// Board with `slot_count` idle slots (at least one).
    pub fn new(slot_count: u32) -> Self {
        let slot_count = slot_count.max(1);
        Self {
            slot_count,
            slots: (1..=slot_count).map(|id| (id, None)).collect(),
        }
    }

    pub fn slot_count(&self) -> u32 {
        self.slot_count
    }

    /// Grow by appending idle slots; shrink by dropping idle slots above `new_count`.
    /// Active slots above `new_count` keep running and close when finished.
    /// `new_count < 1` is ignored.
    pub fn resize(&mut self, new_count: u32) {
        if new_count < 1 {
            return;
        }
        for id in 1..=new_count {
            self.slots.entry(id).or_insert(None);
        }
        self.slots
            .retain(|&id, occupancy| id <= new_count || occupancy.is_some());
        self.slot_count = new_count;
    }

    /// Ascending ids of idle slots within `1..=slot_count`. Closing slots are never refilled.
    pub fn idle_slot_ids(&self) -> Vec<u32> {
        self.slots
            .range(1..=self.slot_count)
            .filter(|(_, occupancy)| occupancy.is_none())
            .map(|(&id, _)| id)
            .collect()
    }

    /// Ids above the configured count that still host a match.
    pub fn closing_slot_ids(&self) -> Vec<u32> {
        self.slots
            .range(self.slot_count + 1..)
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn get(&self, slot_id: u32) -> Option<&ActiveMatch> {
        self.slots.get(&slot_id).and_then(Option::as_ref)
    }

    /// Slot currently hosting `name`, if any.
    pub fn slot_of(&self, name: &str) -> Option<u32> {
        self.active_matches()
            .find(|m| m.involves(name))
            .map(|m| m.slot_id)
    }

    pub fn active_matches(&self) -> impl Iterator<Item = &ActiveMatch> {
        self.slots.values().filter_map(Option::as_ref)
    }

    /// Place a match on an existing slot, replacing whatever was there.
    pub(crate) fn assign(&mut self, slot_id: u32, m: ActiveMatch) {
        self.slots.insert(slot_id, Some(m));
    }

    /// Take the match off a slot. A closing slot is dropped instead of going idle.
    pub(crate) fn clear(&mut self, slot_id: u32) -> Option<ActiveMatch> {
        let taken = self.slots.get_mut(&slot_id).and_then(Option::take);
        if slot_id > self.slot_count {
            self.slots.remove(&slot_id);
        }
        taken
    }

    /// Every slot, in id order.
    pub fn views(&self) -> Vec<SlotView> {
        self.slots
            .iter()
            .map(|(&slot_id, occupancy)| SlotView {
                slot_id,
                closing: slot_id > self.slot_count,
                active: occupancy.clone(),
            })
            .collect()
    }
}

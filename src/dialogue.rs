//! Per-dialogue visibility with auto-hide.
//!
//! Each dialogue id is either hidden or visible. Showing a dialogue schedules
//! its hide on the scene clock; showing it again before that cancels the
//! pending hide and starts a fresh one.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    interaction::DialogueId,
    timer::{TimerHandle, TimerQueue},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Hidden,
    Visible,
}

#[derive(Clone, Debug, Default)]
struct DialogueSlot {
    visibility: Visibility,
    hide_timer: Option<TimerHandle>,
}

#[derive(Clone, Debug, Default)]
pub struct DialogueBoard {
    slots: BTreeMap<DialogueId, DialogueSlot>,
    timers: TimerQueue<DialogueId>,
}

impl DialogueBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ids` as hidden so they appear in snapshots before first use.
    pub fn with_dialogues<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = DialogueId>,
    {
        let mut board = Self::new();
        for id in ids {
            board.slots.entry(id).or_default();
        }
        board
    }

    pub fn show(&mut self, id: &DialogueId, duration_ms: u64, now_ms: u64) {
        let deadline = now_ms.saturating_add(duration_ms);
        let slot = self.slots.entry(id.clone()).or_default();
        if let Some(previous) = slot.hide_timer.take() {
            self.timers.cancel(previous);
        }
        slot.visibility = Visibility::Visible;
        slot.hide_timer = Some(self.timers.schedule(deadline, id.clone()));
        log::debug!("dialogue `{id}` visible until {deadline}ms");
    }

    /// Shows `id` and hides every other visible dialogue.
    pub fn show_exclusive(&mut self, id: &DialogueId, duration_ms: u64, now_ms: u64) {
        let others: Vec<DialogueId> = self
            .slots
            .iter()
            .filter(|(other, slot)| *other != id && slot.visibility == Visibility::Visible)
            .map(|(other, _)| other.clone())
            .collect();
        for other in others {
            self.hide(&other);
        }
        self.show(id, duration_ms, now_ms);
    }

    pub fn hide(&mut self, id: &DialogueId) {
        if let Some(slot) = self.slots.get_mut(id) {
            if let Some(handle) = slot.hide_timer.take() {
                self.timers.cancel(handle);
            }
            slot.visibility = Visibility::Hidden;
        }
    }

    /// Fires due hide timers; returns the dialogues that became hidden.
    pub fn advance(&mut self, now_ms: u64) -> Vec<DialogueId> {
        let mut hidden = Vec::new();
        for (handle, id) in self.timers.pop_due(now_ms) {
            let Some(slot) = self.slots.get_mut(&id) else {
                continue;
            };
            if slot.hide_timer != Some(handle) {
                continue;
            }
            slot.hide_timer = None;
            slot.visibility = Visibility::Hidden;
            hidden.push(id);
        }
        hidden
    }

    /// Cancels every pending hide and returns all dialogues to hidden. Safe to
    /// call repeatedly.
    pub fn teardown(&mut self) -> usize {
        let cancelled = self.timers.cancel_all();
        for slot in self.slots.values_mut() {
            slot.hide_timer = None;
            slot.visibility = Visibility::Hidden;
        }
        cancelled
    }

    #[cfg(test)]
    pub fn visibility(&self, id: &DialogueId) -> Visibility {
        self.slots
            .get(id)
            .map(|slot| slot.visibility)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn is_visible(&self, id: &DialogueId) -> bool {
        self.visibility(id) == Visibility::Visible
    }

    pub fn visible(&self) -> impl Iterator<Item = &DialogueId> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.visibility == Visibility::Visible)
            .map(|(id, _)| id)
    }

    pub fn visibility_map(&self) -> BTreeMap<DialogueId, bool> {
        self.slots
            .iter()
            .map(|(id, slot)| (id.clone(), slot.visibility == Visibility::Visible))
            .collect()
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn king() -> DialogueId {
        DialogueId::new("king")
    }

    #[test]
    fn shown_dialogue_hides_after_its_duration() {
        let mut board = DialogueBoard::new();
        board.show(&king(), 3000, 0);
        assert!(board.advance(2999).is_empty());
        assert!(board.is_visible(&king()));
        assert_eq!(board.advance(3000), vec![king()]);
        assert!(!board.is_visible(&king()));
    }

    #[test]
    fn retrigger_restarts_the_hide_timer() {
        let mut board = DialogueBoard::new();
        board.show(&king(), 3000, 0);
        board.advance(1000);
        board.show(&king(), 3000, 1000);

        assert!(board.advance(3000).is_empty());
        assert!(board.is_visible(&king()));
        assert!(board.advance(3999).is_empty());
        assert!(board.is_visible(&king()));
        assert_eq!(board.advance(4000), vec![king()]);
        assert_eq!(board.pending_timers(), 0);
    }

    #[test]
    fn dialogues_keep_independent_state() {
        let mut board = DialogueBoard::new();
        let npc = DialogueId::new("npc");
        board.show(&npc, 1000, 0);
        board.show(&king(), 3000, 500);
        board.advance(1000);
        assert!(!board.is_visible(&npc));
        assert!(board.is_visible(&king()));
    }

    #[test]
    fn exclusive_show_hides_other_dialogues() {
        let mut board = DialogueBoard::new();
        let npc = DialogueId::new("npc");
        board.show(&npc, 3000, 0);
        board.show_exclusive(&king(), 3000, 100);
        assert!(!board.is_visible(&npc));
        assert_eq!(board.visible().collect::<Vec<_>>(), vec![&king()]);
        assert_eq!(board.pending_timers(), 1);
    }

    #[test]
    fn teardown_cancels_pending_hides_and_is_repeatable() {
        let mut board = DialogueBoard::with_dialogues([king(), DialogueId::new("npc")]);
        board.show(&king(), 3000, 0);
        assert_eq!(board.teardown(), 1);
        assert_eq!(board.teardown(), 0);
        assert!(board.advance(10_000).is_empty());
        assert_eq!(
            board.visibility_map().into_iter().collect::<Vec<_>>(),
            vec![(king(), false), (DialogueId::new("npc"), false)]
        );
    }
}

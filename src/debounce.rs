// TremorTrack — Debounce Confirmer
//
// Ring buffer of the last K per-window band decisions. A detection is only
// surfaced once K consecutive capture windows agree; a single dissenting
// window resets confirmation immediately. One capture window — not one
// sample — is the unit of confirmation.

use crate::config::DEBOUNCE_WINDOWS;

pub struct DebounceConfirmer {
    slots: [bool; DEBOUNCE_WINDOWS],
    cursor: usize,
}

impl DebounceConfirmer {
    pub fn new() -> Self {
        Self {
            slots: [false; DEBOUNCE_WINDOWS],
            cursor: 0,
        }
    }

    /// Record one window's raw band decision, evicting the oldest.
    pub fn insert(&mut self, decision: bool) {
        self.slots[self.cursor] = decision;
        self.cursor = (self.cursor + 1) % DEBOUNCE_WINDOWS;
    }

    /// True iff all K buffered decisions are positive.
    pub fn confirmed(&self) -> bool {
        self.slots.iter().all(|&d| d)
    }
}

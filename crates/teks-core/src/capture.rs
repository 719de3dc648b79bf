use crate::types::{Chord, KeyCode};
use crate::vk_map;

/// Edge of a key signal from the capture widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    Down,
    Up,
}

/// Incremental chord builder driven by raw key-down/key-up signals.
///
/// A chord completes when a non-modifier key goes down while zero or more
/// modifiers are held. Releasing a modifier before that removes it from
/// the pending set. Any key-down after completion starts a fresh capture.
#[derive(Debug, Default)]
pub struct ChordCapture {
    chord: Chord,
}

impl ChordCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chord as captured so far; complete once `key` is set.
    pub fn chord(&self) -> &Chord {
        &self.chord
    }

    /// Feed one key signal and return the updated chord.
    pub fn on_key(&mut self, vk: u16, edge: KeyEdge) -> &Chord {
        match edge {
            KeyEdge::Down => {
                if self.chord.is_complete() {
                    // A new combination is starting over a finished one.
                    self.chord = Chord::empty();
                }
                match vk_map::modifier_from_vk(vk) {
                    Some(m) => self.chord.mods.set(m, true),
                    None => self.chord.key = Some(KeyCode(vk)),
                }
            }
            KeyEdge::Up => {
                // Only a modifier released before the terminal key leaves
                // the pending set; a complete chord stays as captured.
                if let Some(m) = vk_map::modifier_from_vk(vk) {
                    if !self.chord.is_complete() {
                        self.chord.mods.set(m, false);
                    }
                }
            }
        }
        &self.chord
    }

    /// Discard a partial capture (the widget lost focus mid-combination).
    pub fn reset(&mut self) {
        if !self.chord.is_complete() {
            self.chord = Chord::empty();
        }
    }
}

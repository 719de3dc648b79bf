use serde::{Deserialize, Serialize};

/// Windows virtual-key code identifying the terminal key of a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const fn new(vk: u16) -> Self {
        Self(vk)
    }
}

/// One of the five modifier keys a chord may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModKey {
    Cmd,
    Win,
    Ctrl,
    Alt,
    Shift,
}

/// Modifier keys applied to a chord. Stored as flags, so equality is
/// insensitive to the order modifiers were captured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub cmd: bool,
    pub win: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const fn none() -> Self {
        Self {
            cmd: false,
            win: false,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub const fn is_empty(self) -> bool {
        !(self.cmd || self.win || self.ctrl || self.alt || self.shift)
    }

    pub fn contains(self, m: ModKey) -> bool {
        match m {
            ModKey::Cmd => self.cmd,
            ModKey::Win => self.win,
            ModKey::Ctrl => self.ctrl,
            ModKey::Alt => self.alt,
            ModKey::Shift => self.shift,
        }
    }

    pub fn set(&mut self, m: ModKey, held: bool) {
        match m {
            ModKey::Cmd => self.cmd = held,
            ModKey::Win => self.win = held,
            ModKey::Ctrl => self.ctrl = held,
            ModKey::Alt => self.alt = held,
            ModKey::Shift => self.shift = held,
        }
    }
}

/// A keyboard chord: zero or more modifiers plus one terminal key.
///
/// `key == None` means the chord is still being captured. A chord stored
/// in a configured rule is always complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chord {
    #[serde(default)]
    pub mods: Modifiers,
    pub key: Option<KeyCode>,
}

impl Chord {
    pub const fn empty() -> Self {
        Self {
            mods: Modifiers::none(),
            key: None,
        }
    }

    pub const fn new(mods: Modifiers, key: KeyCode) -> Self {
        Self {
            mods,
            key: Some(key),
        }
    }

    pub const fn is_complete(&self) -> bool {
        self.key.is_some()
    }

    /// Deterministic rendering: modifiers in the fixed order Cmd, Win,
    /// Ctrl, Alt, Shift, then the terminal key name with underscores
    /// replaced by spaces and each word title-cased.
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.mods.cmd {
            parts.push("Cmd".to_string());
        }
        if self.mods.win {
            parts.push("Win".to_string());
        }
        if self.mods.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.mods.alt {
            parts.push("Alt".to_string());
        }
        if self.mods.shift {
            parts.push("Shift".to_string());
        }
        parts.push(match self.key {
            Some(k) => match crate::vk_map::vk_name(k.0) {
                Some(name) => title_case(name),
                // Unmapped codes still get a stable rendering.
                None => format!("0x{:02X}", k.0),
            },
            None => String::new(),
        });
        parts.join(" + ")
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(ctrl: bool, alt: bool, shift: bool) -> Modifiers {
        Modifiers {
            ctrl,
            alt,
            shift,
            ..Modifiers::none()
        }
    }

    #[test]
    fn display_orders_modifiers_canonically() {
        // Shift captured before Ctrl still renders Ctrl first.
        let chord = Chord::new(mods(true, false, true), KeyCode(0x41)); // A
        assert_eq!(chord.display(), "Ctrl + Shift + A");
    }

    #[test]
    fn display_title_cases_underscored_names() {
        let chord = Chord::new(Modifiers::none(), KeyCode(0x21)); // PAGE_UP
        assert_eq!(chord.display(), "Page Up");
    }

    #[test]
    fn display_falls_back_to_hex_for_unmapped_codes() {
        let chord = Chord::new(Modifiers::none(), KeyCode(0xE9));
        assert_eq!(chord.display(), "0xE9");
    }

    #[test]
    fn incomplete_chord_renders_modifiers_only() {
        let chord = Chord {
            mods: mods(true, false, false),
            key: None,
        };
        assert_eq!(chord.display(), "Ctrl + ");
        assert!(!chord.is_complete());
    }

    #[test]
    fn modifier_equality_ignores_capture_order() {
        let mut a = Modifiers::none();
        a.set(ModKey::Ctrl, true);
        a.set(ModKey::Shift, true);
        let mut b = Modifiers::none();
        b.set(ModKey::Shift, true);
        b.set(ModKey::Ctrl, true);
        assert_eq!(a, b);
    }
}

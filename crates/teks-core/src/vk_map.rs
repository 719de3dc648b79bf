use crate::types::ModKey;

/// Canonical names for the supported virtual-key set.
///
/// Names are uppercase-with-underscores; `Chord::display` turns them into
/// their human form ("PAGE_UP" -> "Page Up").
pub const VK_NAMES: &[(u16, &str)] = &[
    // Letters
    (0x41, "A"),
    (0x42, "B"),
    (0x43, "C"),
    (0x44, "D"),
    (0x45, "E"),
    (0x46, "F"),
    (0x47, "G"),
    (0x48, "H"),
    (0x49, "I"),
    (0x4A, "J"),
    (0x4B, "K"),
    (0x4C, "L"),
    (0x4D, "M"),
    (0x4E, "N"),
    (0x4F, "O"),
    (0x50, "P"),
    (0x51, "Q"),
    (0x52, "R"),
    (0x53, "S"),
    (0x54, "T"),
    (0x55, "U"),
    (0x56, "V"),
    (0x57, "W"),
    (0x58, "X"),
    (0x59, "Y"),
    (0x5A, "Z"),
    // Digit row
    (0x30, "DIGIT_0"),
    (0x31, "DIGIT_1"),
    (0x32, "DIGIT_2"),
    (0x33, "DIGIT_3"),
    (0x34, "DIGIT_4"),
    (0x35, "DIGIT_5"),
    (0x36, "DIGIT_6"),
    (0x37, "DIGIT_7"),
    (0x38, "DIGIT_8"),
    (0x39, "DIGIT_9"),
    // Function keys
    (0x70, "F1"),
    (0x71, "F2"),
    (0x72, "F3"),
    (0x73, "F4"),
    (0x74, "F5"),
    (0x75, "F6"),
    (0x76, "F7"),
    (0x77, "F8"),
    (0x78, "F9"),
    (0x79, "F10"),
    (0x7A, "F11"),
    (0x7B, "F12"),
    // Navigation / editing
    (0x08, "BACK_SPACE"),
    (0x09, "TAB"),
    (0x0D, "ENTER"),
    (0x1B, "ESCAPE"),
    (0x20, "SPACE"),
    (0x21, "PAGE_UP"),
    (0x22, "PAGE_DOWN"),
    (0x23, "END"),
    (0x24, "HOME"),
    (0x25, "LEFT"),
    (0x26, "UP"),
    (0x27, "RIGHT"),
    (0x28, "DOWN"),
    (0x2C, "PRINT_SCREEN"),
    (0x2D, "INSERT"),
    (0x2E, "DELETE"),
    // Locks
    (0x13, "PAUSE"),
    (0x14, "CAPS_LOCK"),
    (0x90, "NUM_LOCK"),
    (0x91, "SCROLL_LOCK"),
    // Numpad
    (0x60, "NUMPAD_0"),
    (0x61, "NUMPAD_1"),
    (0x62, "NUMPAD_2"),
    (0x63, "NUMPAD_3"),
    (0x64, "NUMPAD_4"),
    (0x65, "NUMPAD_5"),
    (0x66, "NUMPAD_6"),
    (0x67, "NUMPAD_7"),
    (0x68, "NUMPAD_8"),
    (0x69, "NUMPAD_9"),
    (0x6A, "MULTIPLY"),
    (0x6B, "ADD"),
    (0x6D, "SUBTRACT"),
    (0x6E, "DECIMAL"),
    (0x6F, "DIVIDE"),
    // OEM punctuation (US layout)
    (0xBA, "SEMICOLON"),
    (0xBB, "EQUALS"),
    (0xBC, "COMMA"),
    (0xBD, "MINUS"),
    (0xBE, "PERIOD"),
    (0xBF, "SLASH"),
    (0xC0, "BACK_QUOTE"),
    (0xDB, "OPEN_BRACKET"),
    (0xDC, "BACK_SLASH"),
    (0xDD, "CLOSE_BRACKET"),
    (0xDE, "QUOTE"),
];

pub fn vk_name(vk: u16) -> Option<&'static str> {
    VK_NAMES
        .iter()
        .find(|(code, _)| *code == vk)
        .map(|(_, name)| *name)
}

/// Classify a virtual key as one of the chord modifiers.
/// Left/right variants collapse into one flag.
pub fn modifier_from_vk(vk: u16) -> Option<ModKey> {
    match vk {
        0x10 | 0xA0 | 0xA1 => Some(ModKey::Shift), // VK_SHIFT, VK_LSHIFT, VK_RSHIFT
        0x11 | 0xA2 | 0xA3 => Some(ModKey::Ctrl),  // VK_CONTROL, VK_LCONTROL, VK_RCONTROL
        0x12 | 0xA4 | 0xA5 => Some(ModKey::Alt),   // VK_MENU, VK_LMENU, VK_RMENU
        0x5B | 0x5C => Some(ModKey::Win),          // VK_LWIN, VK_RWIN
        _ => None,
    }
}

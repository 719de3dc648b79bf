//! Windows keystroke sink built on `SendInput`.

use crate::scheduler::KeySink;
use crate::types::Chord;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    VIRTUAL_KEY, VK_CONTROL, VK_LWIN, VK_MENU, VK_SHIFT,
};

/// Magic number to identify our own injected events.
const INJECTED_EXTRA_INFO: usize = 0xFFC3C3C3;

/// Presses chords through `SendInput`. The whole down/up sequence goes
/// out in a single batch, so concurrent presses never interleave.
pub struct SendInputSink;

fn key_input(vk: u16, up: bool) -> INPUT {
    let mut flags = KEYBD_EVENT_FLAGS(0);
    if up {
        flags |= KEYEVENTF_KEYUP;
    }
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: INJECTED_EXTRA_INFO,
            },
        },
    }
}

impl KeySink for SendInputSink {
    fn press(&self, chord: &Chord) -> anyhow::Result<()> {
        let key = chord
            .key
            .ok_or_else(|| anyhow::anyhow!("refusing to press an incomplete chord"))?;

        let mut vks: Vec<u16> = Vec::new();
        // There is no Cmd key on this platform; it maps to Win.
        if chord.mods.cmd || chord.mods.win {
            vks.push(VK_LWIN.0);
        }
        if chord.mods.ctrl {
            vks.push(VK_CONTROL.0);
        }
        if chord.mods.alt {
            vks.push(VK_MENU.0);
        }
        if chord.mods.shift {
            vks.push(VK_SHIFT.0);
        }
        vks.push(key.0);

        // Modifiers down, key down, then release in reverse order.
        let mut inputs = Vec::with_capacity(vks.len() * 2);
        for vk in &vks {
            inputs.push(key_input(*vk, false));
        }
        for vk in vks.iter().rev() {
            inputs.push(key_input(*vk, true));
        }

        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            anyhow::bail!("SendInput accepted {sent} of {} events", inputs.len());
        }
        Ok(())
    }
}

//! Windows Virtual Key (VK) code to DOM `KeyboardEvent` translation table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h) and the UI Events
//! KeyboardEvent `code`/`key` value tables.
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code".
//! These are defined in `<winuser.h>` and named `VK_*` (e.g., `VK_RETURN = 0x0D`,
//! `VK_SPACE = 0x20`).  The low-level keyboard hook reports every keystroke as
//! a VK code, so this is the input side of the table.
//!
//! # How this table works
//!
//! `VK_TO_DOM_TABLE` is a compile-time constant array of 256 `Option<DomKey>`
//! values, indexed by VK code.  Position 0x41 holds `KeyA`/`a` because Windows
//! VK_A is 0x41.  Any VK code the remote page has no use for stores `None`.
//!
//! Letters always produce the lowercase key name: Shift is reported through
//! the modifier flags of the forwarded event, never through letter case.

use super::DomKey;

// ── Named VK codes used by the capture rules ─────────────────────────────────

pub const VK_BACK: u8 = 0x08;
pub const VK_TAB: u8 = 0x09;
pub const VK_RETURN: u8 = 0x0D;
/// Generic Shift (reported by some keyboards instead of the sided codes).
pub const VK_SHIFT: u8 = 0x10;
/// Generic Control.
pub const VK_CONTROL: u8 = 0x11;
/// Generic Alt.
pub const VK_MENU: u8 = 0x12;
pub const VK_PAUSE: u8 = 0x13;
pub const VK_CAPITAL: u8 = 0x14;
pub const VK_ESCAPE: u8 = 0x1B;
pub const VK_SPACE: u8 = 0x20;
pub const VK_SNAPSHOT: u8 = 0x2C;
pub const VK_LWIN: u8 = 0x5B;
pub const VK_RWIN: u8 = 0x5C;
pub const VK_APPS: u8 = 0x5D;
pub const VK_F1: u8 = 0x70;
pub const VK_F4: u8 = 0x73;
pub const VK_F12: u8 = 0x7B;
pub const VK_NUMLOCK: u8 = 0x90;
pub const VK_SCROLL: u8 = 0x91;
pub const VK_LSHIFT: u8 = 0xA0;
pub const VK_RSHIFT: u8 = 0xA1;
pub const VK_LCONTROL: u8 = 0xA2;
pub const VK_RCONTROL: u8 = 0xA3;
pub const VK_LMENU: u8 = 0xA4;
pub const VK_RMENU: u8 = 0xA5;

/// Translates a Windows Virtual Key code to its DOM code/key pair.
///
/// Returns `None` for VK codes the remote session has no mapping for
/// (mouse button VKs, numpad, media and browser keys, IME keys ...).
///
/// # Panics
///
/// This function never panics; all u8 inputs are handled.
pub fn vk_to_dom(vk: u8) -> Option<DomKey> {
    VK_TO_DOM_TABLE[vk as usize]
}

/// Translates a DOM code back to a Windows VK code.
///
/// Returns the highest VK carrying `code`, so the sided modifier VKs reported
/// by the low-level hook win over the generic duplicates (`"ShiftLeft"`
/// resolves to `VK_LSHIFT`, not `VK_SHIFT`).
pub fn dom_code_to_vk(code: &str) -> Option<u8> {
    // Linear scan is acceptable: this only runs while loading configuration.
    VK_TO_DOM_TABLE
        .iter()
        .rposition(|entry| matches!(entry, Some(dom) if dom.code == code))
        .map(|vk| vk as u8)
}

const fn dom(code: &'static str, key: &'static str) -> Option<DomKey> {
    Some(DomKey { code, key })
}

/// Complete VK → DOM mapping table indexed by VK code (0x00–0xFF).
///
/// Reference: https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes
const VK_TO_DOM_TABLE: [Option<DomKey>; 256] = {
    let mut t: [Option<DomKey>; 256] = [None; 256];

    // ── Modifier keys ─────────────────────────────────────────────────────────
    t[VK_LWIN as usize] = dom("MetaLeft", "Meta");
    t[VK_RWIN as usize] = dom("MetaRight", "Meta");
    t[VK_MENU as usize] = dom("AltLeft", "Alt");
    t[VK_LMENU as usize] = dom("AltLeft", "Alt");
    t[VK_RMENU as usize] = dom("AltRight", "Alt");
    t[VK_CONTROL as usize] = dom("ControlLeft", "Control");
    t[VK_LCONTROL as usize] = dom("ControlLeft", "Control");
    t[VK_RCONTROL as usize] = dom("ControlRight", "Control");
    t[VK_SHIFT as usize] = dom("ShiftLeft", "Shift");
    t[VK_LSHIFT as usize] = dom("ShiftLeft", "Shift");
    t[VK_RSHIFT as usize] = dom("ShiftRight", "Shift");

    // ── Control keys ─────────────────────────────────────────────────────────
    t[VK_TAB as usize] = dom("Tab", "Tab");
    t[VK_ESCAPE as usize] = dom("Escape", "Escape");
    t[VK_RETURN as usize] = dom("Enter", "Enter");
    t[VK_SPACE as usize] = dom("Space", " ");
    t[VK_BACK as usize] = dom("Backspace", "Backspace");
    t[0x2E] = dom("Delete", "Delete"); // VK_DELETE
    t[0x2D] = dom("Insert", "Insert"); // VK_INSERT

    // ── Navigation cluster ───────────────────────────────────────────────────
    t[0x25] = dom("ArrowLeft", "ArrowLeft"); // VK_LEFT
    t[0x26] = dom("ArrowUp", "ArrowUp"); // VK_UP
    t[0x27] = dom("ArrowRight", "ArrowRight"); // VK_RIGHT
    t[0x28] = dom("ArrowDown", "ArrowDown"); // VK_DOWN
    t[0x24] = dom("Home", "Home"); // VK_HOME
    t[0x23] = dom("End", "End"); // VK_END
    t[0x21] = dom("PageUp", "PageUp"); // VK_PRIOR
    t[0x22] = dom("PageDown", "PageDown"); // VK_NEXT

    // ── Function keys (VK_F1=0x70 … VK_F12=0x7B) ─────────────────────────────
    t[0x70] = dom("F1", "F1");
    t[0x71] = dom("F2", "F2");
    t[0x72] = dom("F3", "F3");
    t[0x73] = dom("F4", "F4");
    t[0x74] = dom("F5", "F5");
    t[0x75] = dom("F6", "F6");
    t[0x76] = dom("F7", "F7");
    t[0x77] = dom("F8", "F8");
    t[0x78] = dom("F9", "F9");
    t[0x79] = dom("F10", "F10");
    t[0x7A] = dom("F11", "F11");
    t[0x7B] = dom("F12", "F12");

    // ── Alphabet keys (VK_A=0x41 … VK_Z=0x5A) ────────────────────────────────
    t[0x41] = dom("KeyA", "a");
    t[0x42] = dom("KeyB", "b");
    t[0x43] = dom("KeyC", "c");
    t[0x44] = dom("KeyD", "d");
    t[0x45] = dom("KeyE", "e");
    t[0x46] = dom("KeyF", "f");
    t[0x47] = dom("KeyG", "g");
    t[0x48] = dom("KeyH", "h");
    t[0x49] = dom("KeyI", "i");
    t[0x4A] = dom("KeyJ", "j");
    t[0x4B] = dom("KeyK", "k");
    t[0x4C] = dom("KeyL", "l");
    t[0x4D] = dom("KeyM", "m");
    t[0x4E] = dom("KeyN", "n");
    t[0x4F] = dom("KeyO", "o");
    t[0x50] = dom("KeyP", "p");
    t[0x51] = dom("KeyQ", "q");
    t[0x52] = dom("KeyR", "r");
    t[0x53] = dom("KeyS", "s");
    t[0x54] = dom("KeyT", "t");
    t[0x55] = dom("KeyU", "u");
    t[0x56] = dom("KeyV", "v");
    t[0x57] = dom("KeyW", "w");
    t[0x58] = dom("KeyX", "x");
    t[0x59] = dom("KeyY", "y");
    t[0x5A] = dom("KeyZ", "z");

    // ── Digit row (VK_0=0x30 … VK_9=0x39) ───────────────────────────────────
    t[0x30] = dom("Digit0", "0");
    t[0x31] = dom("Digit1", "1");
    t[0x32] = dom("Digit2", "2");
    t[0x33] = dom("Digit3", "3");
    t[0x34] = dom("Digit4", "4");
    t[0x35] = dom("Digit5", "5");
    t[0x36] = dom("Digit6", "6");
    t[0x37] = dom("Digit7", "7");
    t[0x38] = dom("Digit8", "8");
    t[0x39] = dom("Digit9", "9");

    // ── US punctuation (VK_OEM_*) ────────────────────────────────────────────
    t[0xBA] = dom("Semicolon", ";"); // VK_OEM_1
    t[0xBB] = dom("Equal", "="); // VK_OEM_PLUS
    t[0xBC] = dom("Comma", ","); // VK_OEM_COMMA
    t[0xBD] = dom("Minus", "-"); // VK_OEM_MINUS
    t[0xBE] = dom("Period", "."); // VK_OEM_PERIOD
    t[0xBF] = dom("Slash", "/"); // VK_OEM_2
    t[0xC0] = dom("Backquote", "`"); // VK_OEM_3
    t[0xDB] = dom("BracketLeft", "["); // VK_OEM_4
    t[0xDC] = dom("Backslash", "\\"); // VK_OEM_5
    t[0xDD] = dom("BracketRight", "]"); // VK_OEM_6
    t[0xDE] = dom("Quote", "'"); // VK_OEM_7

    // ── Lock and system keys ─────────────────────────────────────────────────
    t[VK_CAPITAL as usize] = dom("CapsLock", "CapsLock");
    t[VK_NUMLOCK as usize] = dom("NumLock", "NumLock");
    t[VK_SCROLL as usize] = dom("ScrollLock", "ScrollLock");
    t[VK_SNAPSHOT as usize] = dom("PrintScreen", "PrintScreen");
    t[VK_PAUSE as usize] = dom("Pause", "Pause");
    t[VK_APPS as usize] = dom("ContextMenu", "ContextMenu");

    t
};

// ── Tests ─────────────────────────────────────────────────────────────────────

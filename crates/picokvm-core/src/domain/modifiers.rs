//! Modifier shadow state.
//!
//! Once the low-level hook starts swallowing keys, `GetAsyncKeyState` and
//! friends stop reporting them reliably: a Win key that never reached the
//! shell is, as far as the OS is concerned, not down.  The capture path
//! therefore keeps its own record of every modifier transition it observes
//! and treats that record as the single source of truth.

use serde::{Deserialize, Serialize};

use super::event::{KeyAction, PhysicalKey};
use crate::keymap::windows_vk::{
    VK_CONTROL, VK_LCONTROL, VK_LMENU, VK_LSHIFT, VK_LWIN, VK_MENU, VK_RCONTROL, VK_RMENU,
    VK_RSHIFT, VK_RWIN, VK_SHIFT,
};

/// The four logical modifiers reported to the remote page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

/// Which physical copy of a modifier produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Modifier {
    /// Classifies a VK code as a modifier key.
    ///
    /// The generic `VK_SHIFT`/`VK_CONTROL`/`VK_MENU` codes count as the left key.
    pub fn classify(key: PhysicalKey) -> Option<(Modifier, Side)> {
        match key.vk() {
            VK_SHIFT | VK_LSHIFT => Some((Modifier::Shift, Side::Left)),
            VK_RSHIFT => Some((Modifier::Shift, Side::Right)),
            VK_CONTROL | VK_LCONTROL => Some((Modifier::Ctrl, Side::Left)),
            VK_RCONTROL => Some((Modifier::Ctrl, Side::Right)),
            VK_MENU | VK_LMENU => Some((Modifier::Alt, Side::Left)),
            VK_RMENU => Some((Modifier::Alt, Side::Right)),
            VK_LWIN => Some((Modifier::Meta, Side::Left)),
            VK_RWIN => Some((Modifier::Meta, Side::Right)),
            _ => None,
        }
    }
}

/// Snapshot of the logical modifier flags, as carried by a `KeyboardEvent`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierSet {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl ModifierSet {
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.meta)
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Ctrl => self.ctrl,
            Modifier::Alt => self.alt,
            Modifier::Meta => self.meta,
        }
    }
}

/// Tracks the real pressed state of every modifier key, left and right.
///
/// A flag changes only when its own key is observed: `true` on Pressed,
/// `false` on Released.  The logical flag reported by [`current`](Self::current)
/// stays set while either side is held.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierShadowState {
    left_shift: bool,
    right_shift: bool,
    left_ctrl: bool,
    right_ctrl: bool,
    left_alt: bool,
    right_alt: bool,
    left_meta: bool,
    right_meta: bool,
}

impl ModifierShadowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key transition.
    ///
    /// Returns `true` if the key was a modifier (and the state may have changed).
    pub fn observe(&mut self, key: PhysicalKey, action: KeyAction) -> bool {
        let Some((modifier, side)) = Modifier::classify(key) else {
            return false;
        };
        let is_down = action.is_down();
        let slot = match (modifier, side) {
            (Modifier::Shift, Side::Left) => &mut self.left_shift,
            (Modifier::Shift, Side::Right) => &mut self.right_shift,
            (Modifier::Ctrl, Side::Left) => &mut self.left_ctrl,
            (Modifier::Ctrl, Side::Right) => &mut self.right_ctrl,
            (Modifier::Alt, Side::Left) => &mut self.left_alt,
            (Modifier::Alt, Side::Right) => &mut self.right_alt,
            (Modifier::Meta, Side::Left) => &mut self.left_meta,
            (Modifier::Meta, Side::Right) => &mut self.right_meta,
        };
        *slot = is_down;
        true
    }

    /// Returns the logical modifier snapshot.
    pub fn current(&self) -> ModifierSet {
        ModifierSet {
            shift: self.left_shift || self.right_shift,
            ctrl: self.left_ctrl || self.right_ctrl,
            alt: self.left_alt || self.right_alt,
            meta: self.left_meta || self.right_meta,
        }
    }

    /// Clears every flag.  Called on each capture start and stop.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

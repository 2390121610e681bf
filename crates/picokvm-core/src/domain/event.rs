//! Value types carried along the capture path.
//!
//! ```text
//! OS hook ──(PhysicalKey, KeyAction)──► shadow state / policy
//!                                            │ Intercept
//!                                            ▼
//!                                      RemoteKeyEvent ──► rendering surface
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::modifiers::ModifierSet;
use crate::keymap::KeyEventCodec;

/// A key as reported by the OS hook: a Windows virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalKey(u8);

impl PhysicalKey {
    pub const fn new(vk: u8) -> Self {
        Self(vk)
    }

    /// The raw virtual-key code.
    pub const fn vk(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PhysicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match KeyEventCodec::translate(*self) {
            Some(dom) => f.write_str(dom.code),
            None => write!(f, "VK 0x{:02X}", self.0),
        }
    }
}

/// Error returned when a key name does not match any known DOM code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key name: {0:?}")]
pub struct UnknownKeyName(pub String);

impl FromStr for PhysicalKey {
    type Err = UnknownKeyName;

    /// Parses a DOM code name such as `"F12"` or `"ScrollLock"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyEventCodec::lookup_code(s.trim()).ok_or_else(|| UnknownKeyName(s.to_string()))
    }
}

/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    Pressed,
    Released,
}

impl KeyAction {
    pub fn from_is_down(is_down: bool) -> Self {
        if is_down {
            KeyAction::Pressed
        } else {
            KeyAction::Released
        }
    }

    pub fn is_down(self) -> bool {
        matches!(self, KeyAction::Pressed)
    }

    /// The DOM event type name: `"keydown"` or `"keyup"`.
    pub fn dom_event_type(self) -> &'static str {
        match self {
            KeyAction::Pressed => "keydown",
            KeyAction::Released => "keyup",
        }
    }
}

/// One synthesized key transition destined for the remote session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoteKeyEvent {
    pub action: KeyAction,
    /// DOM `KeyboardEvent.code`.
    pub code: &'static str,
    /// DOM `KeyboardEvent.key`.
    pub key: &'static str,
    /// The originating virtual-key code, reported as `keyCode`.
    pub raw_code: u8,
    /// Modifier snapshot taken after the transition was observed.
    pub modifiers: ModifierSet,
}

impl RemoteKeyEvent {
    /// Builds the event for `key`, or `None` when the key has no mapping.
    pub fn translate(key: PhysicalKey, action: KeyAction, modifiers: ModifierSet) -> Option<Self> {
        let dom = KeyEventCodec::translate(key)?;
        Some(Self {
            action,
            code: dom.code,
            key: dom.key,
            raw_code: key.vk(),
            modifiers,
        })
    }
}

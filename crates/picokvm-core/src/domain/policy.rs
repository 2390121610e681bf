//! Interception policy: which keystrokes are stolen from the local desktop.
//!
//! The goal is to steal only the combinations the Windows shell would consume
//! before the embedded surface ever sees them (Start menu, Win+E, Alt+Tab,
//! Alt+F4 ...).  Ordinary typing, including Ctrl/Shift/Alt combinations,
//! stays on the normal OS delivery path where latency is lowest.

use serde::{Deserialize, Serialize};

use super::event::{KeyAction, PhysicalKey};
use super::modifiers::{Modifier, ModifierSet};
use crate::keymap::windows_vk::{VK_ESCAPE, VK_F12, VK_F4, VK_TAB};
use crate::keymap::KeyEventCodec;

/// Second keys of the Alt chords reserved by the shell: Alt+Tab, Alt+Esc, Alt+F4.
pub const RESERVED_ALT_CHORD_KEYS: [u8; 3] = [VK_TAB, VK_ESCAPE, VK_F4];

/// What the hook does with one key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Let the OS deliver the key normally.
    PassThrough,
    /// Suppress the key locally and forward it to the remote session.
    Intercept,
}

/// How "Alt is down" is established when matching the reserved Alt chords.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AltChordMode {
    /// Only the shadow state counts.
    #[default]
    Shadow,
    /// The shadow state or a live OS key-state query.
    Live,
}

/// Tunable parts of the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Key handed to the local window as the capture/full-screen toggle.
    pub toggle_key: PhysicalKey,
    pub alt_chord_mode: AltChordMode,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            toggle_key: PhysicalKey::new(VK_F12),
            alt_chord_mode: AltChordMode::Shadow,
        }
    }
}

/// The pass-through / intercept decision function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterceptionPolicy {
    config: PolicyConfig,
}

impl InterceptionPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Decides the fate of one key transition.
    ///
    /// `modifiers` must already include the transition itself (observe first,
    /// then decide).  Rules, first match wins:
    ///
    /// 1. the toggle key always passes through to the local window;
    /// 2. keys without a remote mapping pass through;
    /// 3. Shift/Ctrl/Alt pass through, Meta is intercepted;
    /// 4. anything pressed while Meta is down is intercepted;
    /// 5. Tab/Escape/F4 while Alt is down are intercepted;
    /// 6. everything else passes through.
    pub fn decide(&self, key: PhysicalKey, _action: KeyAction, modifiers: ModifierSet) -> Decision {
        if key == self.config.toggle_key {
            return Decision::PassThrough;
        }
        if KeyEventCodec::translate(key).is_none() {
            return Decision::PassThrough;
        }
        match Modifier::classify(key) {
            Some((Modifier::Meta, _)) => return Decision::Intercept,
            Some(_) => return Decision::PassThrough,
            None => {}
        }
        if modifiers.meta {
            return Decision::Intercept;
        }
        if modifiers.alt && RESERVED_ALT_CHORD_KEYS.contains(&key.vk()) {
            return Decision::Intercept;
        }
        Decision::PassThrough
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! KeyPipeline: the work done for every keystroke inside the hook callback.
//!
//! ```text
//! (key, action) ──► shadow.observe ──► policy.decide ──► Intercept? ──► forwarder
//!                                                │
//!                                                └──► Decision returned to the hook
//! ```
//!
//! A key whose press was intercepted stays intercepted (auto-repeat presses
//! and its release) even if the chord that stole it has ended, so the remote
//! always sees the matching keyup.
//!
//! The pipeline is owned by the [`CaptureController`] behind one
//! `std::sync::Mutex`; the hook callback and the controller's transitions are
//! the only code that touches it, so the shadow state is never mutated
//! concurrently.
//!
//! [`CaptureController`]: super::capture_controller::CaptureController

use std::collections::HashSet;
use std::sync::Arc;

use picokvm_core::keymap::windows_vk::VK_MENU;
use picokvm_core::{
    AltChordMode, Decision, InterceptionPolicy, KeyAction, ModifierSet, ModifierShadowState,
    PhysicalKey, RemoteKeyEvent,
};

use super::forward_keys::KeyForwarder;

/// Live OS key-state query (`GetAsyncKeyState` on Windows).
///
/// Only consulted in [`AltChordMode::Live`]; the shadow state remains the
/// source of truth for everything else.
#[cfg_attr(test, mockall::automock)]
pub trait KeyStateQuery: Send + Sync {
    /// Returns `true` if the OS currently reports `key` as held down.
    fn is_down(&self, key: PhysicalKey) -> bool;
}

/// Per-keystroke capture pipeline.
pub struct KeyPipeline {
    active: bool,
    shadow: ModifierShadowState,
    /// Keys whose press was intercepted and whose release is still pending.
    held_remote: HashSet<PhysicalKey>,
    policy: InterceptionPolicy,
    live_keys: Option<Arc<dyn KeyStateQuery>>,
    forwarder: KeyForwarder,
}

impl KeyPipeline {
    /// Creates an inactive pipeline.
    pub fn new(
        policy: InterceptionPolicy,
        forwarder: KeyForwarder,
        live_keys: Option<Arc<dyn KeyStateQuery>>,
    ) -> Self {
        Self {
            active: false,
            shadow: ModifierShadowState::new(),
            held_remote: HashSet::new(),
            policy,
            live_keys,
            forwarder,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn modifiers(&self) -> ModifierSet {
        self.shadow.current()
    }

    /// Clears the shadow state and switches processing on or off.
    pub fn reset(&mut self, active: bool) {
        self.shadow.reset();
        self.held_remote.clear();
        self.active = active;
    }

    /// Handles one hook event and returns what the hook must do with it.
    ///
    /// An inactive pipeline passes everything through without observing it.
    pub fn process(&mut self, key: PhysicalKey, action: KeyAction) -> Decision {
        if !self.active {
            return Decision::PassThrough;
        }

        self.shadow.observe(key, action);
        let modifiers = self.decision_modifiers();

        let decision = match action {
            KeyAction::Pressed if self.held_remote.contains(&key) => Decision::Intercept,
            KeyAction::Pressed => {
                let decision = self.policy.decide(key, action, modifiers);
                if decision == Decision::Intercept {
                    self.held_remote.insert(key);
                }
                decision
            }
            KeyAction::Released if self.held_remote.remove(&key) => Decision::Intercept,
            KeyAction::Released => self.policy.decide(key, action, modifiers),
        };
        if decision == Decision::Intercept {
            // The policy never intercepts an unmapped key, so this always yields an event.
            if let Some(event) = RemoteKeyEvent::translate(key, action, modifiers) {
                self.forwarder.forward(event);
            }
        }
        decision
    }

    fn decision_modifiers(&self) -> ModifierSet {
        let mut modifiers = self.shadow.current();
        if self.policy.config().alt_chord_mode == AltChordMode::Live && !modifiers.alt {
            if let Some(query) = &self.live_keys {
                modifiers.alt = query.is_down(PhysicalKey::new(VK_MENU));
            }
        }
        modifiers
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

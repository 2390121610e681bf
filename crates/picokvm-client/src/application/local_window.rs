//! LocalWindowEvents: turns sampled window state into controller events.
//!
//! Hosts that cannot subscribe to window events sample two facts on a timer:
//! whether the client window is focused, and whether the toggle key is down.
//! Only changes are passed on, as the focus and key events a window would
//! have received.

use picokvm_core::KeyAction;

use super::capture_controller::CaptureController;

#[derive(Debug, Default)]
pub struct LocalWindowEvents {
    focused: Option<bool>,
    toggle_down: bool,
}

impl LocalWindowEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one sample.  The first sample always reports the focus state.
    ///
    /// Toggle key transitions only reach the controller while the window is
    /// focused, as they would for a real window's key handler.
    pub fn update(&mut self, controller: &mut CaptureController, focused: bool, toggle_down: bool) {
        if self.focused != Some(focused) {
            self.focused = Some(focused);
            if focused {
                controller.on_focus_gained();
            } else {
                controller.on_focus_lost();
            }
        }

        if toggle_down != self.toggle_down {
            self.toggle_down = toggle_down;
            if focused {
                let toggle_key = controller.settings().policy.toggle_key;
                controller.on_local_key(toggle_key, KeyAction::from_is_down(toggle_down));
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

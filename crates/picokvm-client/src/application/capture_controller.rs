//! CaptureController: the Idle/Capturing state machine.
//!
//! The controller exclusively owns the OS keyboard hook.  Entering Capturing
//! installs the hook with a handler that runs the [`KeyPipeline`]; leaving it
//! uninstalls the hook.  Both transitions reset the modifier shadow state, so a
//! modifier held while focus moved away is never reported as stuck.
//!
//! What triggers the transitions depends on [`TriggerMode`]:
//!
//! | Mode     | Enter Capturing                  | Leave Capturing                       |
//! |----------|----------------------------------|---------------------------------------|
//! | `focus`  | window gains focus               | window loses focus                    |
//! | `toggle` | toggle while connected           | toggle, or the session disconnects    |

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use picokvm_core::{Decision, InterceptionPolicy, KeyAction, PhysicalKey, PolicyConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::forward_keys::KeyForwarder;
use super::remote_sink::RemoteEventSink;
use super::route_keys::{KeyPipeline, KeyStateQuery};
use crate::infrastructure::input_capture::{HookHandler, KeyboardHook};

/// What drives the Idle/Capturing transitions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Capture while the client window has keyboard focus.
    #[default]
    Focus,
    /// Capture while the operator has switched it on.
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
}

/// Operator-visible capture status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    Idle,
    Capturing,
    /// The last attempt to install the hook failed.
    Unavailable { reason: String },
}

impl fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureStatus::Idle => f.write_str("Keyboard capture off"),
            CaptureStatus::Capturing => f.write_str("Keyboard capture on"),
            CaptureStatus::Unavailable { reason } => {
                write!(f, "Keyboard capture unavailable: {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureSettings {
    pub trigger_mode: TriggerMode,
    pub policy: PolicyConfig,
}

pub struct CaptureController {
    settings: CaptureSettings,
    hook: Box<dyn KeyboardHook>,
    sink: Arc<dyn RemoteEventSink>,
    pipeline: Arc<Mutex<KeyPipeline>>,
    state: CaptureState,
    status: CaptureStatus,
    connected: bool,
}

impl CaptureController {
    /// Creates an Idle controller.  `live_keys` is only consulted in the
    /// `live` Alt-chord mode.
    pub fn new(
        settings: CaptureSettings,
        hook: Box<dyn KeyboardHook>,
        sink: Arc<dyn RemoteEventSink>,
        forwarder: KeyForwarder,
        live_keys: Option<Arc<dyn KeyStateQuery>>,
    ) -> Self {
        let pipeline = KeyPipeline::new(InterceptionPolicy::new(settings.policy), forwarder, live_keys);
        Self {
            settings,
            hook,
            sink,
            pipeline: Arc::new(Mutex::new(pipeline)),
            state: CaptureState::Idle,
            status: CaptureStatus::Idle,
            connected: false,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn status(&self) -> &CaptureStatus {
        &self.status
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn on_focus_gained(&mut self) {
        if self.settings.trigger_mode == TriggerMode::Focus {
            self.begin_capture();
        }
    }

    pub fn on_focus_lost(&mut self) {
        if self.settings.trigger_mode == TriggerMode::Focus {
            self.end_capture();
        }
    }

    /// Flips capture in toggle mode.  Refused while the session is not connected.
    pub fn toggle(&mut self) {
        if self.settings.trigger_mode != TriggerMode::Toggle {
            debug!("capture toggle ignored in focus mode");
            return;
        }
        match self.state {
            CaptureState::Capturing => self.end_capture(),
            CaptureState::Idle if self.connected => self.begin_capture(),
            CaptureState::Idle => info!("capture toggle refused: remote session not connected"),
        }
    }

    /// Records whether the remote session is live.  Losing the session forces
    /// toggle-mode capture off.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
        if !connected && self.settings.trigger_mode == TriggerMode::Toggle {
            self.end_capture();
        }
    }

    /// Key handler for keystrokes the local window receives itself.
    ///
    /// Returns `true` if the key was consumed as the capture toggle.  Other
    /// keys are left to the window.
    pub fn on_local_key(&mut self, key: PhysicalKey, action: KeyAction) -> bool {
        if self.settings.trigger_mode != TriggerMode::Toggle || key != self.settings.policy.toggle_key {
            return false;
        }
        if action == KeyAction::Pressed {
            self.toggle();
        }
        true
    }

    /// Idle → Capturing.  A hook install failure leaves the controller Idle
    /// with an [`CaptureStatus::Unavailable`] status.
    pub fn begin_capture(&mut self) {
        if self.state == CaptureState::Capturing {
            return;
        }

        let pipeline = Arc::clone(&self.pipeline);
        let handler: HookHandler = Arc::new(move |key: PhysicalKey, action: KeyAction| {
            match pipeline.lock() {
                Ok(mut pipeline) => pipeline.process(key, action),
                Err(_) => Decision::PassThrough,
            }
        });

        if let Err(e) = self.hook.install(handler) {
            warn!("keyboard capture unavailable: {e}");
            self.status = CaptureStatus::Unavailable {
                reason: e.to_string(),
            };
            return;
        }

        self.lock_pipeline().reset(true);
        self.state = CaptureState::Capturing;
        self.status = CaptureStatus::Capturing;
        self.sink.focus();
        info!("keyboard capture started");
    }

    /// Capturing → Idle.
    ///
    /// If the hook cannot be removed the pipeline is still switched off, so the
    /// leftover hook passes every key through, and the status reports it.
    pub fn end_capture(&mut self) {
        if self.state == CaptureState::Idle {
            return;
        }

        let removed = self.hook.uninstall();
        self.lock_pipeline().reset(false);
        self.state = CaptureState::Idle;
        self.status = match removed {
            Ok(()) => {
                info!("keyboard capture stopped");
                CaptureStatus::Idle
            }
            Err(e) => {
                warn!("keyboard capture stopped, but the hook is still installed: {e}");
                CaptureStatus::Unavailable {
                    reason: e.to_string(),
                }
            }
        };
    }

    /// Window close.
    pub fn shutdown(&mut self) {
        self.end_capture();
    }

    fn lock_pipeline(&self) -> MutexGuard<'_, KeyPipeline> {
        self.pipeline.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.end_capture();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

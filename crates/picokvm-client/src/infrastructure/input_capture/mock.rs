//! Mock keyboard hook for unit and integration testing.
//!
//! Lets tests feed synthetic keystrokes through whatever handler the
//! controller installed, and count install/uninstall calls, without a Win32
//! message loop.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use picokvm_core::{Decision, KeyAction, PhysicalKey};

use super::{CaptureError, HookHandler, KeyboardHook};

/// A [`KeyboardHook`] that records calls.  Clones share state, so a test can
/// keep one clone while the controller owns another.
#[derive(Clone, Default)]
pub struct MockKeyboardHook {
    handler: Arc<Mutex<Option<HookHandler>>>,
    installs: Arc<AtomicUsize>,
    uninstalls: Arc<AtomicUsize>,
    fail_install: Arc<AtomicBool>,
    fail_uninstall: Arc<AtomicBool>,
}

impl MockKeyboardHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `install` calls fail.
    pub fn set_fail_install(&self, fail: bool) {
        self.fail_install.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent `uninstall` calls fail, leaving the hook installed.
    pub fn set_fail_uninstall(&self, fail: bool) {
        self.fail_uninstall.store(fail, Ordering::SeqCst);
    }

    /// Feeds one keystroke to the installed handler, as the OS would.
    ///
    /// Returns `None` when no hook is installed (the OS would deliver the key
    /// normally).
    pub fn simulate(&self, key: PhysicalKey, action: KeyAction) -> Option<Decision> {
        let handler = self.handler.lock().expect("lock poisoned").clone();
        handler.map(|handler| handler(key, action))
    }

    /// Presses and releases `key`, returning both decisions.
    pub fn tap(&self, key: PhysicalKey) -> (Option<Decision>, Option<Decision>) {
        (
            self.simulate(key, KeyAction::Pressed),
            self.simulate(key, KeyAction::Released),
        )
    }

    pub fn is_installed(&self) -> bool {
        self.handler.lock().expect("lock poisoned").is_some()
    }

    /// Number of successful `install` calls.
    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    /// Number of `uninstall` calls that removed an installed hook.
    pub fn uninstall_count(&self) -> usize {
        self.uninstalls.load(Ordering::SeqCst)
    }
}

impl KeyboardHook for MockKeyboardHook {
    fn install(&mut self, handler: HookHandler) -> Result<(), CaptureError> {
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(CaptureError::KeyboardHookInstallFailed(
                "simulated install failure".to_string(),
            ));
        }
        let mut slot = self.handler.lock().expect("lock poisoned");
        if slot.is_some() {
            return Err(CaptureError::KeyboardHookInstallFailed(
                "hook already installed".to_string(),
            ));
        }
        *slot = Some(handler);
        self.installs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), CaptureError> {
        let mut slot = self.handler.lock().expect("lock poisoned");
        if slot.is_none() {
            return Ok(());
        }
        if self.fail_uninstall.load(Ordering::SeqCst) {
            return Err(CaptureError::KeyboardHookRemoveFailed(
                "simulated remove failure".to_string(),
            ));
        }
        *slot = None;
        self.uninstalls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

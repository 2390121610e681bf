//! Keyboard hook infrastructure.
//!
//! On Windows, [`windows::WindowsKeyboardHook`] installs a `WH_KEYBOARD_LL`
//! hook on a dedicated Win32 message-loop thread.  Unlike a passive capture
//! service, the hook must answer synchronously for every keystroke: the
//! installed [`HookHandler`] returns a [`Decision`] and the hook procedure
//! either swallows the event or hands it to the next hook in the chain.
//!
//! # Callback budget
//!
//! Windows silently removes a low-level hook whose callback takes longer than
//! `LowLevelHooksTimeout` (about 300 ms on most systems).  Handlers must not
//! block on I/O; the client's handler only takes an uncontended mutex and
//! pushes into an unbounded channel.
//!
//! # Testability
//!
//! The [`KeyboardHook`] trait lets tests drive the capture path through
//! [`mock::MockKeyboardHook`] without an OS hook.

use std::sync::Arc;

use picokvm_core::{Decision, KeyAction, PhysicalKey};

use crate::application::route_keys::KeyStateQuery;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

/// Callback invoked for every keystroke while the hook is installed.
pub type HookHandler = Arc<dyn Fn(PhysicalKey, KeyAction) -> Decision + Send + Sync>;

/// Error type for hook operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install keyboard hook: {0}")]
    KeyboardHookInstallFailed(String),
    /// The hook could not be stopped and is still installed.
    #[error("failed to remove keyboard hook: {0}")]
    KeyboardHookRemoveFailed(String),
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// An OS-level keyboard hook that can veto keystrokes.
pub trait KeyboardHook: Send {
    /// Installs the hook.  `handler` is called for every key transition until
    /// [`uninstall`](Self::uninstall) returns.
    fn install(&mut self, handler: HookHandler) -> Result<(), CaptureError>;

    /// Removes the hook.  No-op when not installed.
    ///
    /// On error the hook stays installed and keeps calling its handler.
    fn uninstall(&mut self) -> Result<(), CaptureError>;
}

/// Hook used on platforms without a low-level keyboard hook.  Installing it
/// always fails, which leaves capture Unavailable.
#[derive(Debug, Default)]
pub struct UnsupportedHook;

impl KeyboardHook for UnsupportedHook {
    fn install(&mut self, _handler: HookHandler) -> Result<(), CaptureError> {
        Err(CaptureError::UnsupportedPlatform(std::env::consts::OS.to_string()))
    }

    fn uninstall(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }
}

/// Returns the keyboard hook for the current platform.
pub fn platform_hook() -> Box<dyn KeyboardHook> {
    #[cfg(target_os = "windows")]
    {
        Box::new(self::windows::WindowsKeyboardHook::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(UnsupportedHook)
    }
}

/// Returns the live key-state query for the current platform, if there is one.
pub fn platform_key_state() -> Option<Arc<dyn KeyStateQuery>> {
    #[cfg(target_os = "windows")]
    {
        Some(Arc::new(self::windows::WindowsKeyState))
    }
    #[cfg(not(target_os = "windows"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_hook_install_fails() {
        let mut hook = UnsupportedHook;

        let result = hook.install(Arc::new(|_: PhysicalKey, _: KeyAction| Decision::PassThrough));

        assert!(matches!(result, Err(CaptureError::UnsupportedPlatform(_))));
        assert!(hook.uninstall().is_ok());
    }

    #[test]
    fn test_capture_error_messages() {
        let e = CaptureError::KeyboardHookInstallFailed("access denied".to_string());
        assert_eq!(e.to_string(), "failed to install keyboard hook: access denied");
    }
}

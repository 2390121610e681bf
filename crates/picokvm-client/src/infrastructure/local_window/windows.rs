//! Console window focus via `GetForegroundWindow`.
//!
//! Terminals that host the console in their own window (Windows Terminal)
//! never report the console window as foreground, so capture stays off there.

#![cfg(target_os = "windows")]

use windows::Win32::System::Console::GetConsoleWindow;
use windows::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

use super::WindowFocus;

/// Focus of the console window attached to this process.
#[derive(Debug)]
pub struct ConsoleWindowFocus;

impl ConsoleWindowFocus {
    /// Returns `None` when the process has no console window.
    pub fn detect() -> Option<Self> {
        // SAFETY: no preconditions; returns a null handle without a console.
        let console = unsafe { GetConsoleWindow() };
        if console.is_invalid() {
            None
        } else {
            Some(Self)
        }
    }
}

impl WindowFocus for ConsoleWindowFocus {
    fn is_focused(&self) -> bool {
        // SAFETY: neither call has preconditions.
        let (console, foreground) = unsafe { (GetConsoleWindow(), GetForegroundWindow()) };
        !console.is_invalid() && console == foreground
    }
}

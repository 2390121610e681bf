//! The local window the client runs in, as far as capture is concerned.
//!
//! Focus-driven capture needs to know when that window is in the foreground.
//! A GUI host learns this from its own window events; the command-line client
//! samples it with [`WindowFocus`] instead.

#[cfg(target_os = "windows")]
pub mod windows;

/// Whether the client's own window currently has keyboard focus.
pub trait WindowFocus: Send {
    fn is_focused(&self) -> bool;
}

/// Returns the focus source for the window hosting this process, or `None`
/// when there is no such window to follow.
pub fn platform_window_focus() -> Option<Box<dyn WindowFocus>> {
    #[cfg(target_os = "windows")]
    {
        self::windows::ConsoleWindowFocus::detect().map(|focus| Box::new(focus) as Box<dyn WindowFocus>)
    }
    #[cfg(not(target_os = "windows"))]
    {
        None
    }
}

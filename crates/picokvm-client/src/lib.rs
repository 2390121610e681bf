//! picokvm-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does picokvm-client do? (for beginners)
//!
//! The client shows a PicoKVM device's web console inside a desktop window.
//! Typing into a browser page works out of the box, except for the chords the
//! Windows shell grabs first: the Win key, Win+anything, Alt+Tab, Alt+Esc and
//! Alt+F4.  To get those to the remote machine the client:
//!
//! 1. Logs in to the device (`POST /auth/login-local`) and attaches the
//!    returned `authToken` cookie to the rendering surface before navigating.
//! 2. While its window is focused (or while the operator has toggled capture
//!    on), installs a system-wide low-level keyboard hook.
//! 3. For every keystroke, updates the modifier shadow state and asks the
//!    interception policy whether to steal the key.
//! 4. Stolen keys are suppressed locally and re-synthesized inside the
//!    rendering surface as DOM `KeyboardEvent`s, in the order they happened.

/// Application layer: capture controller, key pipeline and session bootstrap.
pub mod application;

/// Infrastructure layer: OS hook, HTTP adapters, configuration and surface adapter.
pub mod infrastructure;

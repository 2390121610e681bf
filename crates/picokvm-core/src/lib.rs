//! # picokvm-core
//!
//! Pure keyboard-capture logic for the PicoKVM desktop client: key code
//! translation, modifier shadow state and the interception policy.
//!
//! This crate has zero dependencies on OS APIs, UI frameworks, or network
//! sockets, so every rule that decides what happens to a keystroke can be
//! tested on any platform without installing a real keyboard hook.
//!
//! # Architecture overview (for beginners)
//!
//! The client shows a remote KVM device inside a browser surface.  Some key
//! chords (Win+E, Alt+Tab, Alt+F4 ...) would normally be consumed by the local
//! desktop shell before the browser ever sees them.  The client therefore
//! installs a system-wide keyboard hook and, for each keystroke, asks this
//! crate three questions:
//!
//! - **`domain::modifiers`** – Which modifier keys are really down right now?
//!   Once keys are intercepted the OS can no longer answer this reliably, so
//!   the answer comes from a locally tracked *shadow state*.
//!
//! - **`domain::policy`** – Should this key be left to the local desktop
//!   (pass-through) or stolen and forwarded to the remote session (intercept)?
//!
//! - **`keymap`** – What DOM `code`/`key` pair does the remote page expect for
//!   this Windows virtual-key code?

pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `picokvm_core::PhysicalKey` instead of `picokvm_core::domain::event::PhysicalKey`.
pub use domain::event::{KeyAction, PhysicalKey, RemoteKeyEvent};
pub use domain::modifiers::{Modifier, ModifierSet, ModifierShadowState, Side};
pub use domain::policy::{AltChordMode, Decision, InterceptionPolicy, PolicyConfig};
pub use keymap::{DomKey, KeyEventCodec};

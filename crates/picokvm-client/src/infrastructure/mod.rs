//! Infrastructure layer for the client.
//!
//! Contains OS-facing adapters: the low-level keyboard hook, the focus of the
//! local window, the HTTP calls made to the device, configuration file
//! storage, and the adapter that turns key events into script for the
//! rendering surface.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `picokvm_core`; the application layer only uses the traits declared here.

pub mod input_capture;
pub mod local_window;
pub mod network;
pub mod storage;
pub mod surface;

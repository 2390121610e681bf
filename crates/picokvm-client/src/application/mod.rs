//! Application layer use cases for the client.
//!
//! Use cases in this layer orchestrate the pure `picokvm_core` rules and
//! depend on abstractions (traits) rather than on the OS hook, the HTTP client
//! or the rendering surface, so each of them is testable with in-memory doubles.
//!
//! # Sub-modules
//!
//! - **`remote_sink`** – The [`RemoteEventSink`](remote_sink::RemoteEventSink)
//!   trait: what the capture path needs from the rendering surface.
//!
//! - **`forward_keys`** – FIFO, fire-and-forget delivery of intercepted key
//!   events onto the surface's async context.
//!
//! - **`route_keys`** – The per-keystroke pipeline executed inside the hook
//!   callback: shadow state, policy, translation, enqueue.
//!
//! - **`capture_controller`** – The Idle/Capturing state machine that owns the
//!   hook installation.
//!
//! - **`local_window`** – Turns sampled window focus and toggle-key state into
//!   controller events for hosts without window event callbacks.
//!
//! - **`session_bootstrap`** – Credential → session token exchange before the
//!   surface navigates to the device.

pub mod capture_controller;
pub mod forward_keys;
pub mod local_window;
pub mod remote_sink;
pub mod route_keys;
pub mod session_bootstrap;

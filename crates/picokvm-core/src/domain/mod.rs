//! Domain entities for keyboard capture.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: it can be compiled and tested on any platform without a
//! keyboard hook, a browser surface or a network.
//!
//! - [`event`] – the value types that flow through the capture path.
//! - [`modifiers`] – the modifier shadow state.
//! - [`policy`] – the pass-through / intercept decision rules.

pub mod event;
pub mod modifiers;
pub mod policy;

//! The rendering surface as seen by the capture path.
//!
//! The surface (an embedded browser view showing the device console) is an
//! external collaborator.  The application layer only needs three things from
//! it: accept a synthesized key event, navigate with an optional session
//! token, and take keyboard focus.

use async_trait::async_trait;
use picokvm_core::RemoteKeyEvent;
use thiserror::Error;

use super::session_bootstrap::SessionToken;

/// Error type for rendering surface operations.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The surface has not been created yet or was already torn down.
    #[error("rendering surface is not attached")]
    NotAttached,
    /// Script injection into the page failed.
    #[error("script execution failed: {0}")]
    Script(String),
    /// The surface refused the navigation or cookie.
    #[error("navigation failed: {0}")]
    Navigation(String),
}

/// Trait for delivering input and navigation to the rendering surface.
///
/// Infrastructure implementations drive a browser view; test implementations
/// record calls.
#[async_trait]
pub trait RemoteEventSink: Send + Sync {
    /// Injects one key transition into the remote session's input stream.
    async fn dispatch_key_event(&self, event: RemoteKeyEvent) -> Result<(), SinkError>;

    /// Attaches `token` as the session cookie for the URL's host, then loads `url`.
    async fn navigate(&self, url: &str, token: Option<&SessionToken>) -> Result<(), SinkError>;

    /// Moves keyboard focus into the surface.
    fn focus(&self);
}

//! Session bootstrap: exchange the operator's credential for a session token
//! and open the device console in the rendering surface.
//!
//! Authentication is best-effort.  A device with authentication disabled, a
//! wrong password or an unreachable login endpoint all end the same way: the
//! surface navigates without a token and the device shows its own login page.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use super::remote_sink::{RemoteEventSink, SinkError};

/// URL loaded into the surface when the session is closed.
pub const BLANK_PAGE: &str = "about:blank";

/// Opaque session token returned by the device login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// The operator-supplied password.  Empty means "do not attempt login".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionCredential(..)")
    }
}

/// Why a login attempt produced no token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login rejected with HTTP status {0}")]
    Rejected(u16),
    #[error("login request timed out")]
    Timeout,
    #[error("login request failed: {0}")]
    Transport(String),
    #[error("login succeeded but no session token was returned")]
    MissingToken,
    #[error("invalid device endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Exchanges a credential for a session token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(
        &self,
        endpoint: &str,
        credential: &SessionCredential,
    ) -> Result<SessionToken, AuthError>;
}

/// How the surface ended up navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// No token was attached; the device's own login page will appear.
    Unauthenticated,
    /// The session cookie was attached before navigation.
    Authenticated,
}

/// Logs in (when a credential is given) and navigates the surface to `endpoint`.
///
/// The surface is navigated exactly once, whatever the login outcome.  Only a
/// navigation failure is returned as an error.
pub async fn open_session(
    endpoint: &str,
    credential: &SessionCredential,
    authenticator: &dyn Authenticator,
    sink: &dyn RemoteEventSink,
) -> Result<SessionMode, SinkError> {
    let token = if credential.is_empty() {
        None
    } else {
        match authenticator.login(endpoint, credential).await {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("login to {endpoint} failed, continuing without a session: {e}");
                None
            }
        }
    };

    sink.navigate(endpoint, token.as_ref()).await?;

    let mode = if token.is_some() {
        SessionMode::Authenticated
    } else {
        SessionMode::Unauthenticated
    };
    info!("opened {endpoint} ({mode:?})");
    Ok(mode)
}

/// Navigates the surface away from the device console.
pub async fn close_session(sink: &dyn RemoteEventSink) -> Result<(), SinkError> {
    sink.navigate(BLANK_PAGE, None).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Rendering surface adapter.
//!
//! The device console runs in an embedded browser view.  Everything the
//! capture path needs from that view can be expressed with four primitives
//! ([`ScriptSurface`]): run a script in the page, set a cookie, load a URL
//! and take focus.  [`ScriptEventSink`] builds the
//! [`RemoteEventSink`](crate::application::remote_sink::RemoteEventSink)
//! operations on top of them:
//!
//! - a key event becomes
//!   `document.dispatchEvent(new KeyboardEvent('keydown', {...}));`
//! - navigation with a token first sets the `authToken` cookie for the URL's
//!   host, then loads the URL.

use async_trait::async_trait;
use picokvm_core::RemoteKeyEvent;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::application::remote_sink::{RemoteEventSink, SinkError};
use crate::application::session_bootstrap::SessionToken;
use crate::infrastructure::network::login::AUTH_COOKIE;

pub mod headless;
pub mod mock;

/// A cookie to be stored in the surface's cookie jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

/// Primitive operations of an embedded browser view.
#[async_trait]
pub trait ScriptSurface: Send + Sync {
    async fn execute_script(&self, script: &str) -> Result<(), SinkError>;
    async fn set_cookie(&self, cookie: &SurfaceCookie) -> Result<(), SinkError>;
    async fn load(&self, url: &str) -> Result<(), SinkError>;
    fn focus(&self);
}

/// `KeyboardEventInit` dictionary, serialised straight into the script.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyboardEventInit<'a> {
    code: &'a str,
    key: &'a str,
    key_code: u8,
    alt_key: bool,
    ctrl_key: bool,
    shift_key: bool,
    meta_key: bool,
    bubbles: bool,
    cancelable: bool,
}

/// Renders `event` as a script that dispatches it on the page's document.
pub fn dispatch_script(event: &RemoteKeyEvent) -> Result<String, SinkError> {
    let init = KeyboardEventInit {
        code: event.code,
        key: event.key,
        key_code: event.raw_code,
        alt_key: event.modifiers.alt,
        ctrl_key: event.modifiers.ctrl,
        shift_key: event.modifiers.shift,
        meta_key: event.modifiers.meta,
        bubbles: true,
        cancelable: true,
    };
    let init = serde_json::to_string(&init).map_err(|e| SinkError::Script(e.to_string()))?;
    Ok(format!(
        "document.dispatchEvent(new KeyboardEvent('{}', {init}));",
        event.action.dom_event_type()
    ))
}

/// Builds the session cookie for `url`: domain is the URL's host, path `/`.
pub fn session_cookie(url: &str, token: &SessionToken) -> Result<SurfaceCookie, SinkError> {
    let parsed = Url::parse(url).map_err(|e| SinkError::Navigation(e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| SinkError::Navigation(format!("{url} has no host for the session cookie")))?;
    Ok(SurfaceCookie {
        name: AUTH_COOKIE.to_string(),
        value: token.value().to_string(),
        domain: host.to_string(),
        path: "/".to_string(),
    })
}

/// [`RemoteEventSink`] over any [`ScriptSurface`].
pub struct ScriptEventSink<S> {
    surface: S,
}

impl<S: ScriptSurface> ScriptEventSink<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[async_trait]
impl<S: ScriptSurface> RemoteEventSink for ScriptEventSink<S> {
    async fn dispatch_key_event(&self, event: RemoteKeyEvent) -> Result<(), SinkError> {
        let script = dispatch_script(&event)?;
        self.surface.execute_script(&script).await
    }

    async fn navigate(&self, url: &str, token: Option<&SessionToken>) -> Result<(), SinkError> {
        if let Some(token) = token {
            let cookie = session_cookie(url, token)?;
            debug!("setting {} cookie for {}", cookie.name, cookie.domain);
            self.surface.set_cookie(&cookie).await?;
        }
        self.surface.load(url).await
    }

    fn focus(&self) {
        self.surface.focus();
    }
}

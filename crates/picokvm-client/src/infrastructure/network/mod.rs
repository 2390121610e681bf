//! HTTP adapters for talking to the device.
//!
//! # Sub-modules
//!
//! - **`login`** – [`HttpAuthenticator`](login::HttpAuthenticator), the
//!   production [`Authenticator`](crate::application::session_bootstrap::Authenticator):
//!   `POST /auth/login-local` and extraction of the `authToken` cookie from a
//!   per-login cookie jar.
//!
//! - **`probe`** – Address normalisation and the "is this really a PicoKVM?"
//!   check performed before a session is opened.

pub mod login;
pub mod probe;

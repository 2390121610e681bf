//! `POST /auth/login-local` against the device.
//!
//! The device answers a correct password with a 2xx status and an
//! `authToken` cookie.  The cookie may arrive on a redirect hop, so every login
//! runs with its own cookie jar and the token is read from the jar once the
//! final response is in.  The value is the session token later attached to the
//! rendering surface.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::application::session_bootstrap::{
    AuthError, Authenticator, SessionCredential, SessionToken,
};

/// Login path, relative to the device root.
pub const LOGIN_PATH: &str = "/auth/login-local";

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "authToken";

pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

/// reqwest-backed [`Authenticator`].  One attempt per call, no retry.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    timeout: Duration,
}

impl HttpAuthenticator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// A client whose cookies from every hop of the exchange land in `jar`.
    fn client_with_jar(&self, jar: Arc<Jar>) -> Result<Client, AuthError> {
        Client::builder()
            .timeout(self.timeout)
            .cookie_provider(jar)
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))
    }
}

/// Builds the login URL for `endpoint`, rejecting anything that is not http(s).
pub fn login_url(endpoint: &str) -> Result<Url, AuthError> {
    let parsed = Url::parse(endpoint).map_err(|e| AuthError::InvalidEndpoint(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AuthError::InvalidEndpoint(format!(
            "unsupported scheme `{}`",
            parsed.scheme()
        )));
    }
    let joined = format!("{}{LOGIN_PATH}", endpoint.trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| AuthError::InvalidEndpoint(e.to_string()))
}

/// Finds `name` in a `Cookie` header value (`a=1; b=2`).
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn login(
        &self,
        endpoint: &str,
        credential: &SessionCredential,
    ) -> Result<SessionToken, AuthError> {
        let url = login_url(endpoint)?;
        debug!("POST {url}");

        let jar = Arc::new(Jar::default());
        let response = self
            .client_with_jar(Arc::clone(&jar))?
            .post(url.clone())
            .json(&LoginRequest {
                password: credential.expose(),
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::Timeout
                } else {
                    AuthError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(status.as_u16()));
        }

        let cookies = jar.cookies(&url).ok_or(AuthError::MissingToken)?;
        let token = cookies
            .to_str()
            .ok()
            .and_then(|header| cookie_value(header, AUTH_COOKIE))
            .map(SessionToken::new)
            .ok_or(AuthError::MissingToken)?;

        info!("logged in to {endpoint}");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::network::stub::{
        http_response, serve_once, serve_sequence, serve_silence,
    };

    fn authenticator(timeout: Duration) -> HttpAuthenticator {
        HttpAuthenticator::new(timeout)
    }

    #[test]
    fn test_login_url_joins_without_double_slash() {
        assert_eq!(
            login_url("http://10.126.126.5/").unwrap().as_str(),
            "http://10.126.126.5/auth/login-local"
        );
        assert_eq!(
            login_url("https://kvm.local").unwrap().as_str(),
            "https://kvm.local/auth/login-local"
        );
    }

    #[test]
    fn test_login_url_rejects_non_http_endpoints() {
        assert!(matches!(login_url("ftp://kvm"), Err(AuthError::InvalidEndpoint(_))));
        assert!(matches!(login_url("not a url"), Err(AuthError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn test_login_returns_auth_token_cookie() {
        // Arrange
        let (base, server) = serve_once(http_response(
            "200 OK",
            &["Set-Cookie: authToken=tok-42; Path=/; HttpOnly"],
            "{}",
        ))
        .await;

        // Act
        let token = authenticator(DEFAULT_LOGIN_TIMEOUT)
            .login(&base, &SessionCredential::new("hunter2"))
            .await
            .expect("login should succeed");

        // Assert
        assert_eq!(token.value(), "tok-42");
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /auth/login-local HTTP/1.1"));
        assert!(request.contains(r#"{"password":"hunter2"}"#));
    }

    #[tokio::test]
    async fn test_login_keeps_cookie_set_on_redirect() {
        // Arrange: the device sets the cookie on a 302, then serves the page.
        let (base, server) = serve_sequence(vec![
            http_response(
                "302 Found",
                &["Set-Cookie: authToken=tok-r; Path=/", "Location: /"],
                "",
            ),
            http_response("200 OK", &[], "ok"),
        ])
        .await;

        // Act
        let token = authenticator(DEFAULT_LOGIN_TIMEOUT)
            .login(&base, &SessionCredential::new("hunter2"))
            .await
            .expect("login should succeed");

        // Assert
        assert_eq!(token.value(), "tok-r");
        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("POST /auth/login-local "));
        assert!(requests[1].starts_with("GET / "));
    }

    #[test]
    fn test_cookie_value_picks_named_pair() {
        assert_eq!(cookie_value("theme=dark; authToken=abc", AUTH_COOKIE), Some("abc"));
        assert_eq!(cookie_value("authTokenX=1", AUTH_COOKIE), None);
        assert_eq!(cookie_value("", AUTH_COOKIE), None);
    }

    #[tokio::test]
    async fn test_login_ignores_other_cookies() {
        let (base, _server) = serve_once(http_response(
            "200 OK",
            &["Set-Cookie: theme=dark; Path=/", "Set-Cookie: authToken=abc; Path=/"],
            "",
        ))
        .await;

        let token = authenticator(DEFAULT_LOGIN_TIMEOUT)
            .login(&base, &SessionCredential::new("pw"))
            .await
            .unwrap();

        assert_eq!(token.value(), "abc");
    }

    #[tokio::test]
    async fn test_login_401_is_rejected() {
        let (base, _server) = serve_once(http_response("401 Unauthorized", &[], "")).await;

        let result = authenticator(DEFAULT_LOGIN_TIMEOUT)
            .login(&base, &SessionCredential::new("wrong"))
            .await;

        assert!(matches!(result, Err(AuthError::Rejected(401))));
    }

    #[tokio::test]
    async fn test_login_success_without_cookie_is_missing_token() {
        let (base, _server) = serve_once(http_response("200 OK", &[], "{}")).await;

        let result = authenticator(DEFAULT_LOGIN_TIMEOUT)
            .login(&base, &SessionCredential::new("pw"))
            .await;

        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn test_login_times_out() {
        let (base, _server) = serve_silence().await;

        let result = authenticator(Duration::from_millis(200))
            .login(&base, &SessionCredential::new("pw"))
            .await;

        assert!(matches!(result, Err(AuthError::Timeout)));
    }

    #[tokio::test]
    async fn test_login_connection_refused_is_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = authenticator(DEFAULT_LOGIN_TIMEOUT)
            .login(&format!("http://{addr}"), &SessionCredential::new("pw"))
            .await;

        assert!(matches!(result, Err(AuthError::Transport(_))));
    }
}

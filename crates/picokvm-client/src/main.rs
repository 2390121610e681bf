//! PicoKVM client entry point.
//!
//! Connects to a PicoKVM device and keeps system-wide keyboard capture
//! running until Ctrl+C.
//!
//! # Usage
//!
//! ```text
//! picokvm-client [OPTIONS]
//!
//! Options:
//!   --url <URL>                 Device address [env: PICOKVM_URL]
//!   --password <PASSWORD>       Login password [env: PICOKVM_PASSWORD]
//!   --trigger-mode <MODE>       focus | toggle
//!   --config <PATH>             Use this config file instead of the platform one
//!   --no-save                   Do not write the address/password back
//! ```
//!
//! # Startup sequence
//!
//! ```text
//! main()
//!  ├─ load config.toml, apply CLI overrides, init tracing
//!  ├─ normalize + probe the device address
//!  ├─ save address/password (unless --no-save)
//!  ├─ KeyForwarder::spawn        (delivery task)
//!  ├─ open_session               (login → cookie → navigate)
//!  ├─ CaptureController          (Idle)
//!  ├─ sample console focus + toggle key until Ctrl+C
//!  └─ shutdown → close_session
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use picokvm_client::application::capture_controller::{CaptureController, TriggerMode};
use picokvm_client::application::forward_keys::KeyForwarder;
use picokvm_client::application::local_window::LocalWindowEvents;
use picokvm_client::application::remote_sink::RemoteEventSink;
use picokvm_client::application::route_keys::KeyStateQuery;
use picokvm_client::application::session_bootstrap::{
    close_session, open_session, SessionCredential,
};
use picokvm_client::infrastructure::input_capture::{platform_hook, platform_key_state};
use picokvm_client::infrastructure::local_window::{platform_window_focus, WindowFocus};
use picokvm_client::infrastructure::network::login::HttpAuthenticator;
use picokvm_client::infrastructure::network::probe::{
    normalize_device_url, probe_device, DEFAULT_PROBE_TIMEOUT,
};
use picokvm_client::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to,
};
use picokvm_client::infrastructure::surface::headless::LoggingSurface;
use picokvm_client::infrastructure::surface::ScriptEventSink;

/// How long shutdown waits for queued key events to drain.
const DELIVERY_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// How often the console focus and the toggle key are sampled.
const WINDOW_POLL_INTERVAL: Duration = Duration::from_millis(25);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// PicoKVM desktop client.
///
/// Forwards OS-reserved key chords (Win, Alt+Tab, ...) to the device console.
#[derive(Debug, Parser)]
#[command(
    name = "picokvm-client",
    about = "Keyboard capture client for LuckFox PicoKVM devices",
    version
)]
struct Cli {
    /// Device address.  `http://` is added when no scheme is given.
    #[arg(long, env = "PICOKVM_URL")]
    url: Option<String>,

    /// Device login password.  Empty skips the login request.
    #[arg(long, env = "PICOKVM_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// What switches keyboard capture on and off.
    #[arg(long, value_enum)]
    trigger_mode: Option<TriggerMode>,

    /// Config file to use instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not save the device address and password after connecting.
    #[arg(long)]
    no_save: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => config_file_path().context("locating config file")?,
    };
    let mut config = load_config_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level)),
        )
        .init();

    info!("PicoKVM client starting");

    if let Some(mode) = cli.trigger_mode {
        config.capture.trigger_mode = mode;
    }
    let settings = config
        .capture
        .to_settings()
        .context("invalid [capture] configuration")?;

    let url = normalize_device_url(cli.url.as_deref().unwrap_or(&config.device.url))?;
    let password = cli.password.unwrap_or_else(|| config.device.password.clone());

    probe_device(&url, DEFAULT_PROBE_TIMEOUT)
        .await
        .with_context(|| format!("cannot connect to {url}"))?;

    config.device.url = url.clone();
    config.device.password = password.clone();
    if !cli.no_save {
        if let Err(e) = save_config_to(&config, &config_path) {
            warn!("could not save settings: {e}");
        }
    }

    // ── Session ───────────────────────────────────────────────────────────────
    let sink: Arc<dyn RemoteEventSink> = Arc::new(ScriptEventSink::new(LoggingSurface::new()));
    let (forwarder, delivery) = KeyForwarder::spawn(Arc::clone(&sink));

    let authenticator = HttpAuthenticator::new(config.device.login_timeout());
    let mode = open_session(
        &url,
        &SessionCredential::new(password),
        &authenticator,
        sink.as_ref(),
    )
    .await
    .with_context(|| format!("opening {url}"))?;
    info!("session ready ({mode:?})");

    // ── Capture ───────────────────────────────────────────────────────────────
    let key_state = platform_key_state();
    let mut controller = CaptureController::new(
        settings,
        platform_hook(),
        Arc::clone(&sink),
        forwarder,
        key_state.clone(),
    );
    controller.set_connected(true);

    match platform_window_focus() {
        Some(window) => {
            follow_local_window(&mut controller, window.as_ref(), key_state.as_deref()).await?
        }
        None => {
            warn!("no local window to follow; keyboard capture stays off");
            tokio::signal::ctrl_c()
                .await
                .context("listening for Ctrl+C")?;
        }
    }
    info!("received Ctrl+C, shutting down");

    // Dropping the controller drops the last forwarder, which ends delivery.
    controller.shutdown();
    drop(controller);
    if tokio::time::timeout(DELIVERY_DRAIN_TIMEOUT, delivery).await.is_err() {
        warn!("key delivery did not drain in time");
    }

    if let Err(e) = close_session(sink.as_ref()).await {
        warn!("could not close session: {e}");
    }

    info!("PicoKVM client stopped");
    Ok(())
}

/// Samples the console window until Ctrl+C and feeds focus changes and
/// toggle-key transitions to the controller.
async fn follow_local_window(
    controller: &mut CaptureController,
    window: &dyn WindowFocus,
    key_state: Option<&dyn KeyStateQuery>,
) -> anyhow::Result<()> {
    let toggle_key = controller.settings().policy.toggle_key;
    let mut events = LocalWindowEvents::new();
    let mut ticker = tokio::time::interval(WINDOW_POLL_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_status = controller.status().clone();
    info!("{last_status}");
    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("listening for Ctrl+C")?;
                return Ok(());
            }
            _ = ticker.tick() => {
                let focused = window.is_focused();
                let toggle_down = key_state.is_some_and(|keys| keys.is_down(toggle_key));
                events.update(controller, focused, toggle_down);
                if *controller.status() != last_status {
                    last_status = controller.status().clone();
                    info!("{last_status}");
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_without_arguments_defers_to_config() {
        // Arrange / Act
        let cli = Cli::try_parse_from(["picokvm-client"]).expect("parse");

        // Assert
        assert_eq!(cli.trigger_mode, None);
        assert!(!cli.no_save);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "picokvm-client",
            "--url",
            "10.0.0.7",
            "--password",
            "pw",
            "--trigger-mode",
            "toggle",
            "--no-save",
        ])
        .expect("parse");

        assert_eq!(cli.url.as_deref(), Some("10.0.0.7"));
        assert_eq!(cli.password.as_deref(), Some("pw"));
        assert_eq!(cli.trigger_mode, Some(TriggerMode::Toggle));
        assert!(cli.no_save);
    }

    #[test]
    fn test_cli_rejects_unknown_trigger_mode() {
        let result = Cli::try_parse_from(["picokvm-client", "--trigger-mode", "hover"]);
        assert!(result.is_err());
    }
}

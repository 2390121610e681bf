//! Surface used when the client runs without an embedded browser view.
//!
//! Every operation is logged instead of rendered, which is enough to run the
//! capture path end to end from the command line and watch what would reach
//! the device console (`RUST_LOG=picokvm_client=debug`).

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, info};

use super::{ScriptSurface, SurfaceCookie};
use crate::application::remote_sink::SinkError;
use crate::application::session_bootstrap::BLANK_PAGE;

/// Logs every surface operation.  Scripts are rejected until a page is loaded.
#[derive(Debug, Default)]
pub struct LoggingSurface {
    loaded: AtomicBool,
}

impl LoggingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScriptSurface for LoggingSurface {
    async fn execute_script(&self, script: &str) -> Result<(), SinkError> {
        if !self.loaded.load(Ordering::SeqCst) {
            return Err(SinkError::NotAttached);
        }
        debug!("script: {script}");
        Ok(())
    }

    async fn set_cookie(&self, cookie: &SurfaceCookie) -> Result<(), SinkError> {
        debug!("cookie {} set for {}{}", cookie.name, cookie.domain, cookie.path);
        Ok(())
    }

    async fn load(&self, url: &str) -> Result<(), SinkError> {
        info!("loading {url}");
        self.loaded.store(url != BLANK_PAGE, Ordering::SeqCst);
        Ok(())
    }

    fn focus(&self) {
        debug!("surface focused");
    }
}

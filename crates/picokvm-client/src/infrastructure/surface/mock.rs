//! Recording surface for unit and integration testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ScriptSurface, SurfaceCookie};
use crate::application::remote_sink::SinkError;

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Script(String),
    Cookie(SurfaceCookie),
    Load(String),
    Focus,
}

/// A [`ScriptSurface`] that records every call in order.  Clones share state.
#[derive(Clone)]
pub struct RecordingSurface {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
    attached: Arc<AtomicBool>,
}

impl RecordingSurface {
    /// Creates an attached surface with no recorded calls.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            attached: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A detached surface rejects every async operation with `NotAttached`.
    pub fn set_attached(&self, attached: bool) {
        self.attached.store(attached, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Recorded scripts, in execution order.
    pub fn scripts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Script(script) => Some(script),
                _ => None,
            })
            .collect()
    }

    /// Recorded loads, in order.
    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Load(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn cookies(&self) -> Vec<SurfaceCookie> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Cookie(cookie) => Some(cookie),
                _ => None,
            })
            .collect()
    }

    pub fn focus_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == SurfaceCall::Focus)
            .count()
    }

    fn record(&self, call: SurfaceCall) -> Result<(), SinkError> {
        if !self.attached.load(Ordering::SeqCst) {
            return Err(SinkError::NotAttached);
        }
        self.calls.lock().expect("lock poisoned").push(call);
        Ok(())
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScriptSurface for RecordingSurface {
    async fn execute_script(&self, script: &str) -> Result<(), SinkError> {
        self.record(SurfaceCall::Script(script.to_string()))
    }

    async fn set_cookie(&self, cookie: &SurfaceCookie) -> Result<(), SinkError> {
        self.record(SurfaceCall::Cookie(cookie.clone()))
    }

    async fn load(&self, url: &str) -> Result<(), SinkError> {
        self.record(SurfaceCall::Load(url.to_string()))
    }

    fn focus(&self) {
        let _ = self.record(SurfaceCall::Focus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let surface = RecordingSurface::new();

        surface.load("http://kvm").await.unwrap();
        surface.execute_script("1").await.unwrap();
        surface.focus();

        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::Load("http://kvm".to_string()),
                SurfaceCall::Script("1".to_string()),
                SurfaceCall::Focus,
            ]
        );
        assert_eq!(surface.focus_count(), 1);
        assert_eq!(surface.scripts(), vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn test_detached_surface_records_nothing() {
        let surface = RecordingSurface::new();
        surface.set_attached(false);

        let result = surface.load("http://kvm").await;

        assert!(matches!(result, Err(SinkError::NotAttached)));
        assert!(surface.calls().is_empty());
    }
}

//! Canned [`DashboardQuery`] sources.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::OrchestrationError;
use crate::port::DashboardQuery;

/// Returns fixed items, optionally after a delay.
pub struct StaticQuery {
    label: String,
    items: Vec<Value>,
    delay: Duration,
    fetches: AtomicU32,
}

impl StaticQuery {
    pub fn new(label: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            label: label.into(),
            items,
            delay: Duration::ZERO,
            fetches: AtomicU32::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DashboardQuery for StaticQuery {
    async fn fetch(&self) -> Result<Vec<Value>, OrchestrationError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.items.clone())
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Always fails with the given error.
pub struct FailingQuery {
    label: String,
    error: OrchestrationError,
}

impl FailingQuery {
    pub fn new(label: impl Into<String>, error: OrchestrationError) -> Self {
        Self {
            label: label.into(),
            error,
        }
    }
}

#[async_trait]
impl DashboardQuery for FailingQuery {
    async fn fetch(&self) -> Result<Vec<Value>, OrchestrationError> {
        Err(self.error.clone())
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Never answers.
pub struct HangingQuery;

#[async_trait]
impl DashboardQuery for HangingQuery {
    async fn fetch(&self) -> Result<Vec<Value>, OrchestrationError> {
        std::future::pending().await
    }

    fn label(&self) -> &str {
        "hanging"
    }
}

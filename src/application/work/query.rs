//! Dashboard data source backed by a work request.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::poller::WorkPoller;
use crate::domain::error::OrchestrationError;
use crate::domain::work::{WorkItem, WorkRequest};
use crate::port::DashboardQuery;

/// Runs one [`WorkRequest`] per fetch and hands back the flattened items.
pub struct WorkQuery {
    poller: Arc<WorkPoller>,
    request: WorkRequest,
}

impl WorkQuery {
    pub fn new(poller: Arc<WorkPoller>, request: WorkRequest) -> Self {
        Self { poller, request }
    }
}

#[async_trait]
impl DashboardQuery for WorkQuery {
    async fn fetch(&self) -> Result<Vec<Value>, OrchestrationError> {
        let items = self.poller.submit_and_await(&self.request).await?;
        Ok(items.iter().map(WorkItem::to_value).collect())
    }

    fn label(&self) -> &str {
        self.request.resource()
    }
}

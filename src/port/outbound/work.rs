//! Work manager port.
//!
//! The manager accepts work submissions and reports progress keyed by the
//! returned handle. Both calls answer with a `RetString`: the handle on
//! submission, a JSON-encoded progress envelope on status.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::work::{WorkHandle, WorkRequest};
use crate::error::Result;

/// Reply to a work submission.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmitReply {
    #[serde(default)]
    pub ret_string: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl SubmitReply {
    pub fn accepted(handle: impl Into<String>) -> Self {
        Self {
            ret_string: Some(handle.into()),
            error: None,
        }
    }

    pub fn rejected(error: Value) -> Self {
        Self {
            ret_string: None,
            error: Some(error),
        }
    }
}

/// Reply to a status query. `ret_string` holds a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusReply {
    #[serde(default)]
    pub ret_string: String,
}

/// Direct lookup against the manager, bypassing the work queue.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub resource_type: String,
    pub name: String,
    /// Extra fields merged over the default search body.
    pub overrides: serde_json::Map<String, Value>,
}

impl SearchQuery {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            overrides: serde_json::Map::new(),
        }
    }
}

/// Remote work manager.
#[async_trait]
pub trait WorkManager: Send + Sync {
    /// Submit a work item.
    async fn submit(&self, request: &WorkRequest) -> Result<SubmitReply>;

    /// Fetch the current progress of a submitted item.
    async fn status(&self, handle: &WorkHandle) -> Result<StatusReply>;

    /// Run a direct search and return the decoded `Result` field.
    async fn search(&self, query: &SearchQuery) -> Result<Value>;
}

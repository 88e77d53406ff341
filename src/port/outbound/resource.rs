//! Resource API port (get/create/patch/delete by path).
//!
//! Replies are passed through untouched: a failed call that still reached
//! the server comes back as `Ok` with a status object carrying `code` and
//! `message`. `Err` is reserved for calls that produced no reply at all.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// One JSON-patch operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOp {
    pub op: &'static str,
    pub path: String,
    pub value: Value,
}

impl PatchOp {
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: "replace",
            path: path.into(),
            value,
        }
    }
}

#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;

    async fn create(&self, path: &str, body: &Value) -> Result<Value>;

    async fn patch(&self, path: &str, ops: &[PatchOp]) -> Result<Value>;

    async fn delete(&self, path: &str) -> Result<Value>;
}

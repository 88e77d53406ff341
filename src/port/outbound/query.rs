//! Dashboard data source port.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::OrchestrationError;

/// A query producing a list of JSON items for one dashboard group.
///
/// An error payload from the remote side is reported as
/// [`OrchestrationError::RemoteOperationFailed`].
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Value>, OrchestrationError>;

    /// Short label for logs.
    fn label(&self) -> &str;
}

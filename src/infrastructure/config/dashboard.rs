//! Dashboard aggregation settings.

use serde::{Deserialize, Serialize};

/// `[dashboard]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardConfig {
    /// Per-query timeout. Falls back to the manager poll timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_timeout_ms: Option<u64>,
}

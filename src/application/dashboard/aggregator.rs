//! Concurrent fan-out over dashboard groups.
//!
//! Every group runs at once. Inside a group the status and reference
//! queries also run at once, each raced against the same timeout. A group
//! whose queries fail degrades to error-tagged sections; the others are
//! unaffected.

use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::section::SectionGroup;
use crate::application::deadline::race_deadline;
use crate::domain::dashboard::{DashboardCard, DashboardChart, DashboardData, SectionError};
use crate::domain::error::OrchestrationError;

/// Error text for a group whose status query timed out.
pub const TIMED_OUT: &str = "Request timed out";
/// Error text for a group whose status query returned an error payload.
pub const STATUS_FAILED: &str = "An error occurred while getting status data";

struct GroupOutcome {
    cards: Vec<DashboardCard>,
    charts: Vec<DashboardChart>,
    error: Option<SectionError>,
}

pub struct DashboardAggregator {
    timeout: Duration,
}

impl DashboardAggregator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run every group and merge the results.
    ///
    /// Cards and charts of the group that finished last come first.
    pub async fn aggregate(&self, groups: Vec<SectionGroup>) -> DashboardData {
        let mut pending: FuturesUnordered<_> =
            groups.iter().map(|group| self.run_group(group)).collect();

        let mut data = DashboardData::default();
        while let Some(outcome) = pending.next().await {
            data.card_items.splice(0..0, outcome.cards);
            data.pie_chart_items.splice(0..0, outcome.charts);
            data.errors.extend(outcome.error);
        }

        info!(
            cards = data.card_items.len(),
            charts = data.pie_chart_items.len(),
            degraded = data.errors.len(),
            "Dashboard aggregated"
        );
        data
    }

    async fn run_group(&self, group: &SectionGroup) -> GroupOutcome {
        let (status, reference) = tokio::join!(
            race_deadline(self.timeout, group.status_query.fetch()),
            race_deadline(self.timeout, group.reference_query.fetch()),
        );

        match pair(status, reference) {
            Ok((status, reference)) => {
                debug!(group = %group.label, items = status.len(), "Group fetched");
                GroupOutcome {
                    cards: group.cards.iter().map(|card| card.build(&status, &reference)).collect(),
                    charts: group.charts.iter().map(|chart| chart.build(&status, &reference)).collect(),
                    error: None,
                }
            }
            Err(err) => {
                let message = degradation_message(&err);
                warn!(group = %group.label, error = %err, "Dashboard group degraded");
                GroupOutcome {
                    cards: group.cards.iter().map(|card| card.degraded(&message)).collect(),
                    charts: group
                        .charts
                        .iter()
                        .map(|chart| DashboardChart::degraded(chart.name.clone(), message.clone()))
                        .collect(),
                    error: Some(SectionError {
                        section: group.label.clone(),
                        message,
                    }),
                }
            }
        }
    }
}

/// Pair both results once both settled; the status failure wins if both failed.
fn pair(
    status: Result<Vec<Value>, OrchestrationError>,
    reference: Result<Vec<Value>, OrchestrationError>,
) -> Result<(Vec<Value>, Vec<Value>), OrchestrationError> {
    Ok((status?, reference?))
}

fn degradation_message(err: &OrchestrationError) -> String {
    match err {
        OrchestrationError::Timeout { .. } => TIMED_OUT.to_string(),
        OrchestrationError::RemoteOperationFailed { .. } => STATUS_FAILED.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_is_stable() {
        let err = OrchestrationError::Timeout {
            after: Duration::from_secs(10),
        };
        assert_eq!(degradation_message(&err), TIMED_OUT);
    }

    #[test]
    fn status_failure_wins_over_reference_failure() {
        let status = Err(OrchestrationError::Timeout {
            after: Duration::from_secs(1),
        });
        let reference = Err(OrchestrationError::Transport("refused".into()));
        assert!(pair(status, reference).unwrap_err().is_timeout());
    }
}

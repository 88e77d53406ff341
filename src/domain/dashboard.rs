//! Aggregate view handed to the presentation layer.
//!
//! Every card and chart is always present. A section whose data could not
//! be fetched carries an `error` string and no tally instead of being
//! dropped.

use serde::Serialize;

use super::health::{Health, HealthTally};

/// Maximum detail rows kept per card after ranking.
pub const TABLE_LIMIT: usize = 5;

/// One detail row of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub status: Health,
    pub resource_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(rename = "clusterIP", skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,
}

impl TableRow {
    pub fn new(status: Health, resource_name: impl Into<String>) -> Self {
        Self {
            status,
            resource_name: resource_name.into(),
            percentage: None,
            namespace: None,
            cluster_ip: None,
        }
    }
}

/// Stable-sort rows worst bucket first, then keep the top [`TABLE_LIMIT`].
pub fn rank_rows(mut rows: Vec<TableRow>) -> Vec<TableRow> {
    rows.sort_by_key(|row| row.status);
    rows.truncate(TABLE_LIMIT);
    rows
}

/// One dashboard card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Counts over every item, not just the kept rows. `None` when degraded.
    pub tally: Option<HealthTally>,
    pub table: Vec<TableRow>,
    pub error: Option<String>,
}

impl DashboardCard {
    pub fn degraded(name: impl Into<String>, kind: Option<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            tally: None,
            table: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// One pie chart: `[bucket, count]` pairs in healthy, warning, critical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardChart {
    pub name: String,
    pub data: Vec<[String; 2]>,
    pub error: Option<String>,
}

impl DashboardChart {
    pub fn from_tally(name: impl Into<String>, tally: &HealthTally) -> Self {
        Self {
            name: name.into(),
            data: tally
                .entries()
                .iter()
                .map(|(health, count)| [health.as_str().to_string(), count.to_string()])
                .collect(),
            error: None,
        }
    }

    pub fn degraded(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// A section that degraded, with the captured error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionError {
    pub section: String,
    pub message: String,
}

/// The full aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub card_items: Vec<DashboardCard>,
    pub pie_chart_items: Vec<DashboardChart>,
    pub errors: Vec<SectionError>,
}

impl DashboardData {
    pub fn card(&self, name: &str) -> Option<&DashboardCard> {
        self.card_items.iter().find(|card| card.name == name)
    }

    pub fn chart(&self, name: &str) -> Option<&DashboardChart> {
        self.pie_chart_items.iter().find(|chart| chart.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(buckets: &[Health]) -> Vec<TableRow> {
        buckets
            .iter()
            .enumerate()
            .map(|(idx, health)| TableRow::new(*health, format!("item-{idx}")))
            .collect()
    }

    #[test]
    fn ranking_puts_critical_rows_first_and_truncates() {
        use Health::{Critical, Healthy, Warning};
        let ranked = rank_rows(rows(&[Healthy, Critical, Warning, Critical, Healthy, Healthy, Critical]));

        assert_eq!(ranked.len(), TABLE_LIMIT);
        let names: Vec<_> = ranked.iter().take(3).map(|row| row.resource_name.as_str()).collect();
        assert_eq!(names, vec!["item-1", "item-3", "item-6"]);
        assert_eq!(ranked[3].status, Warning);
        assert_eq!(ranked[4].status, Healthy);
    }

    #[test]
    fn chart_data_follows_fixed_bucket_order() {
        let tally = HealthTally {
            healthy: 3,
            warning: 1,
            critical: 0,
        };
        let chart = DashboardChart::from_tally("clusters", &tally);
        assert_eq!(
            chart.data,
            vec![
                ["healthy".to_string(), "3".to_string()],
                ["warning".to_string(), "1".to_string()],
                ["critical".to_string(), "0".to_string()],
            ]
        );
    }

    #[test]
    fn degraded_card_serializes_error_without_tally() {
        let card = DashboardCard::degraded("pods", Some("pods".into()), "Request timed out");
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["error"], "Request timed out");
        assert!(value["tally"].is_null());
        assert_eq!(value["table"], serde_json::json!([]));
    }
}

//! Card and chart definitions, and how one group's data becomes sections.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::dashboard::{rank_rows, DashboardCard, DashboardChart, TableRow};
use crate::domain::health::{Classifier, Health, HealthTally};
use crate::port::DashboardQuery;

/// Which item a card classifies: the status item or the reference item at
/// the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Status,
    Reference,
}

/// How a status item becomes a detail row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTransform {
    /// Cluster `ip` and `metadata.name`.
    Cluster,
    /// Like [`RowTransform::Cluster`] plus the rounded value of a field.
    Percentage(String),
    /// Release `name`/`namespace`; cluster IP looked up in the reference list.
    Release,
    /// Pod `metadata.name`, empty cluster IP.
    Pod,
}

impl RowTransform {
    pub fn apply(&self, item: &Value, status: Health, reference: &[Value]) -> TableRow {
        match self {
            RowTransform::Cluster => TableRow {
                cluster_ip: Some(text(item, "/ip")),
                ..TableRow::new(status, resource_name(item))
            },
            RowTransform::Percentage(field) => TableRow {
                cluster_ip: Some(text(item, "/ip")),
                percentage: item.get(field).and_then(Value::as_f64).map(|p| p.round() as i64),
                ..TableRow::new(status, resource_name(item))
            },
            RowTransform::Release => {
                let cluster = item.get("cluster").and_then(Value::as_str);
                let cluster_ip = reference
                    .iter()
                    .find(|c| cluster.is_some() && c.pointer("/metadata/name").and_then(Value::as_str) == cluster)
                    .and_then(|c| c.get("clusterip"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                TableRow {
                    namespace: item.get("namespace").and_then(Value::as_str).map(str::to_string),
                    cluster_ip,
                    ..TableRow::new(status, text(item, "/name"))
                }
            }
            RowTransform::Pod => TableRow {
                cluster_ip: Some(String::new()),
                ..TableRow::new(status, resource_name(item))
            },
        }
    }
}

/// `metadata.name`, falling back to the flattened item's `name`.
fn resource_name(item: &Value) -> String {
    item.pointer("/metadata/name")
        .or_else(|| item.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn text(item: &Value, pointer: &str) -> String {
    item.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Clone)]
pub struct CardSpec {
    pub name: String,
    pub kind: Option<String>,
    pub classifier: Classifier,
    pub subject: Subject,
    pub transform: RowTransform,
}

impl CardSpec {
    pub fn new(name: impl Into<String>, transform: RowTransform) -> Self {
        Self {
            name: name.into(),
            kind: None,
            classifier: Classifier::Status,
            subject: Subject::Status,
            transform,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = subject;
        self
    }

    /// Classify every status item, tally all of them, keep the worst rows.
    pub fn build(&self, status: &[Value], reference: &[Value]) -> DashboardCard {
        let mut tally = HealthTally::default();
        let mut rows = Vec::with_capacity(status.len());

        for (idx, item) in status.iter().enumerate() {
            let subject = match self.subject {
                Subject::Status => item,
                Subject::Reference => reference.get(idx).unwrap_or(&Value::Null),
            };
            let health = self.classifier.classify(subject);
            tally.record(health);
            rows.push(self.transform.apply(item, health, reference));
        }

        DashboardCard {
            name: self.name.clone(),
            kind: self.kind.clone(),
            tally: Some(tally),
            table: rank_rows(rows),
            error: None,
        }
    }

    pub fn degraded(&self, error: &str) -> DashboardCard {
        DashboardCard::degraded(self.name.clone(), self.kind.clone(), error)
    }
}

/// A pie chart over one group; classifies the reference item per index.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub name: String,
    pub classifier: Classifier,
}

impl ChartSpec {
    pub fn new(name: impl Into<String>, classifier: Classifier) -> Self {
        Self {
            name: name.into(),
            classifier,
        }
    }

    pub fn build(&self, status: &[Value], reference: &[Value]) -> DashboardChart {
        let tally: HealthTally = (0..status.len())
            .map(|idx| self.classifier.classify(reference.get(idx).unwrap_or(&Value::Null)))
            .collect();
        DashboardChart::from_tally(self.name.clone(), &tally)
    }
}

/// One logical dashboard group: two queries feeding any number of sections.
#[derive(Clone)]
pub struct SectionGroup {
    pub label: String,
    pub status_query: Arc<dyn DashboardQuery>,
    pub reference_query: Arc<dyn DashboardQuery>,
    pub cards: Vec<CardSpec>,
    pub charts: Vec<ChartSpec>,
}

impl SectionGroup {
    pub fn new(
        label: impl Into<String>,
        status_query: Arc<dyn DashboardQuery>,
        reference_query: Arc<dyn DashboardQuery>,
    ) -> Self {
        Self {
            label: label.into(),
            status_query,
            reference_query,
            cards: Vec::new(),
            charts: Vec::new(),
        }
    }

    pub fn card(mut self, card: CardSpec) -> Self {
        self.cards.push(card);
        self
    }

    pub fn chart(mut self, chart: ChartSpec) -> Self {
        self.charts.push(chart);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cluster(name: &str, cpu: f64) -> Value {
        json!({"metadata": {"name": name}, "ip": "10.0.0.1", "cpuUtilization": cpu, "clusterip": "10.1.1.1"})
    }

    #[test]
    fn percentage_card_tallies_all_items_but_keeps_five_rows() {
        let status: Vec<Value> = [95.0, 80.0, 10.0, 20.0, 30.0, 91.0, 40.0]
            .iter()
            .enumerate()
            .map(|(idx, cpu)| cluster(&format!("c{idx}"), *cpu))
            .collect();
        let card = CardSpec::new("cpu", RowTransform::Percentage("cpuUtilization".into()))
            .with_classifier(Classifier::percentage("cpuUtilization"))
            .build(&status, &[]);

        let tally = card.tally.unwrap();
        assert_eq!((tally.critical, tally.warning, tally.healthy), (2, 1, 4));
        assert_eq!(card.table.len(), 5);
        assert_eq!(card.table[0].resource_name, "c0");
        assert_eq!(card.table[0].percentage, Some(95));
        assert_eq!(card.table[1].resource_name, "c5");
        assert_eq!(card.table[2].status, Health::Warning);
    }

    #[test]
    fn release_row_looks_up_cluster_ip() {
        let release = json!({"name": "web", "namespace": "default", "cluster": "c1", "status": "DEPLOYED"});
        let card = CardSpec::new("helm releases", RowTransform::Release)
            .with_kind("releases")
            .build(&[release], &[cluster("c1", 0.0)]);

        let row = &card.table[0];
        assert_eq!(row.status, Health::Healthy);
        assert_eq!(row.resource_name, "web");
        assert_eq!(row.namespace.as_deref(), Some("default"));
        assert_eq!(row.cluster_ip.as_deref(), Some("10.1.1.1"));
    }

    #[test]
    fn reference_subject_classifies_paired_item() {
        let status = vec![json!({"metadata": {"name": "c1"}, "status": "ok"})];
        let reference = vec![json!({"metadata": {"name": "c1"}, "status": "failed"})];
        let card = CardSpec::new("clusters", RowTransform::Cluster)
            .with_subject(Subject::Reference)
            .build(&status, &reference);
        assert_eq!(card.tally.unwrap().critical, 1);
    }

    #[test]
    fn chart_counts_reference_buckets() {
        let status = vec![json!({}), json!({}), json!({})];
        let reference = vec![json!({"status": "ok"}), json!({"status": "pending"})];
        let chart = ChartSpec::new("clusters", Classifier::Status).build(&status, &reference);
        assert_eq!(chart.data[0], ["healthy".to_string(), "1".to_string()]);
        assert_eq!(chart.data[1], ["warning".to_string(), "1".to_string()]);
        assert_eq!(chart.data[2], ["critical".to_string(), "1".to_string()]);
    }
}

//! Health buckets and the rules that assign them.
//!
//! Two classifiers exist:
//!
//! - **Status text**: a lowercase lookup in [`STATUS_TABLE`]. Anything not
//!   listed is `critical`. Items without a `status` string fall back to a
//!   boolean `state` field, and items with neither are `critical`.
//! - **Percentage**: a numeric field compared against thresholds. Above 90
//!   is `critical`, above 75 is `warning`, otherwise `healthy`. A missing or
//!   non-numeric value is `critical`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display bucket for one item. Ordered worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Critical,
    Warning,
    Healthy,
}

impl Health {
    pub const fn as_str(self) -> &'static str {
        match self {
            Health::Critical => "critical",
            Health::Warning => "warning",
            Health::Healthy => "healthy",
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status strings (lowercase) and the bucket they map to.
pub const STATUS_TABLE: &[(&str, Health)] = &[
    ("failed", Health::Critical),
    ("pending", Health::Warning),
    ("deleting", Health::Warning),
    ("ok", Health::Healthy),
    ("running", Health::Healthy),
    ("succeeded", Health::Healthy),
    ("healthy", Health::Healthy),
    ("deployed", Health::Healthy),
];

/// Bucket for an unrecognised status string.
pub const UNKNOWN_STATUS: Health = Health::Critical;

pub const CRITICAL_ABOVE: f64 = 90.0;
pub const WARNING_ABOVE: f64 = 75.0;

/// Look up a status string, case-insensitively.
pub fn from_status(status: &str) -> Health {
    let status = status.to_ascii_lowercase();
    STATUS_TABLE
        .iter()
        .find(|(name, _)| *name == status)
        .map_or(UNKNOWN_STATUS, |(_, health)| *health)
}

/// Classify by threshold; `None` is critical.
pub fn from_percentage(percent: Option<f64>) -> Health {
    match percent {
        Some(p) if p.is_nan() => Health::Critical,
        Some(p) if p > CRITICAL_ABOVE => Health::Critical,
        Some(p) if p > WARNING_ABOVE => Health::Warning,
        Some(_) => Health::Healthy,
        None => Health::Critical,
    }
}

/// How a dashboard section buckets its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classifier {
    /// `status` string, then boolean `state`.
    Status,
    /// Numeric utilisation field, e.g. `cpuUtilization`.
    Percentage(String),
}

impl Classifier {
    pub fn percentage(field: impl Into<String>) -> Self {
        Classifier::Percentage(field.into())
    }

    pub fn classify(&self, item: &Value) -> Health {
        match self {
            Classifier::Status => {
                if let Some(status) = item.get("status").and_then(Value::as_str) {
                    return from_status(status);
                }
                match item.get("state").and_then(Value::as_bool) {
                    Some(true) => Health::Healthy,
                    _ => Health::Critical,
                }
            }
            Classifier::Percentage(field) => from_percentage(item.get(field).and_then(Value::as_f64)),
        }
    }
}

/// Counts per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthTally {
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
}

impl HealthTally {
    pub fn record(&mut self, health: Health) {
        match health {
            Health::Healthy => self.healthy += 1,
            Health::Warning => self.warning += 1,
            Health::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.warning + self.critical
    }

    /// `(bucket, count)` pairs in healthy, warning, critical order.
    pub fn entries(&self) -> [(Health, usize); 3] {
        [
            (Health::Healthy, self.healthy),
            (Health::Warning, self.warning),
            (Health::Critical, self.critical),
        ]
    }
}

impl FromIterator<Health> for HealthTally {
    fn from_iter<I: IntoIterator<Item = Health>>(iter: I) -> Self {
        let mut tally = Self::default();
        for health in iter {
            tally.record(health);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_lookup_is_case_insensitive() {
        assert_eq!(from_status("Running"), Health::Healthy);
        assert_eq!(from_status("DEPLOYED"), Health::Healthy);
        assert_eq!(from_status("Pending"), Health::Warning);
        assert_eq!(from_status("deleting"), Health::Warning);
        assert_eq!(from_status("Failed"), Health::Critical);
    }

    #[test]
    fn unknown_status_is_critical() {
        assert_eq!(from_status("CrashLoopBackOff"), Health::Critical);
        assert_eq!(from_status(""), Health::Critical);
    }

    #[test]
    fn status_classifier_falls_back_to_state_flag() {
        let classifier = Classifier::Status;
        assert_eq!(classifier.classify(&json!({"state": true})), Health::Healthy);
        assert_eq!(classifier.classify(&json!({"state": false})), Health::Critical);
        assert_eq!(classifier.classify(&json!({})), Health::Critical);
        assert_eq!(classifier.classify(&Value::Null), Health::Critical);
    }

    #[test]
    fn percentage_thresholds() {
        assert_eq!(from_percentage(Some(95.0)), Health::Critical);
        assert_eq!(from_percentage(Some(90.0)), Health::Warning);
        assert_eq!(from_percentage(Some(76.0)), Health::Warning);
        assert_eq!(from_percentage(Some(75.0)), Health::Healthy);
        assert_eq!(from_percentage(Some(0.0)), Health::Healthy);
        assert_eq!(from_percentage(None), Health::Critical);
    }

    #[test]
    fn percentage_classifier_reads_named_field() {
        let classifier = Classifier::percentage("cpuUtilization");
        assert_eq!(classifier.classify(&json!({"cpuUtilization": 80})), Health::Warning);
        assert_eq!(classifier.classify(&json!({"cpuUtilization": 0})), Health::Healthy);
        assert_eq!(classifier.classify(&json!({"memoryUtilization": 10})), Health::Critical);
    }

    #[test]
    fn buckets_order_worst_first() {
        let mut buckets = vec![Health::Healthy, Health::Critical, Health::Warning];
        buckets.sort();
        assert_eq!(buckets, vec![Health::Critical, Health::Warning, Health::Healthy]);
    }

    #[test]
    fn tally_collects_from_iterator() {
        let tally: HealthTally = [Health::Healthy, Health::Critical, Health::Critical]
            .into_iter()
            .collect();
        assert_eq!(tally.critical, 2);
        assert_eq!(tally.healthy, 1);
        assert_eq!(tally.total(), 3);
    }
}

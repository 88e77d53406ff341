//! Handler for `dashboard`.

use tabled::Tabled;

use crate::adapter::inbound::cli::output;
use crate::application::dashboard::{standard_groups, DashboardAggregator, DashboardSources};
use crate::domain::dashboard::{DashboardCard, TableRow};
use crate::error::Result;

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Usage")]
    percentage: String,
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Cluster IP")]
    cluster_ip: String,
}

impl From<&TableRow> for CardRow {
    fn from(row: &TableRow) -> Self {
        Self {
            status: output::health(row.status),
            resource: row.resource_name.clone(),
            percentage: row.percentage.map(|p| format!("{p}%")).unwrap_or_default(),
            namespace: row.namespace.clone().unwrap_or_default(),
            cluster_ip: row.cluster_ip.clone().unwrap_or_default(),
        }
    }
}

fn print_card(card: &DashboardCard) {
    output::section(&card.name);
    if let Some(error) = &card.error {
        output::warning(error);
        return;
    }
    if let Some(tally) = &card.tally {
        let summary: Vec<String> = tally
            .entries()
            .iter()
            .map(|(bucket, count)| format!("{count} {}", output::health(*bucket)))
            .collect();
        output::field("Total", format!("{} ({})", tally.total(), summary.join(", ")));
    }
    if card.table.is_empty() {
        output::note("(no items)");
    } else {
        output::table(card.table.iter().map(CardRow::from));
    }
}

/// Execute `dashboard`.
pub async fn execute(aggregator: &DashboardAggregator, sources: &DashboardSources) -> Result<()> {
    let data = aggregator.aggregate(standard_groups(sources)).await;

    if output::is_json() {
        output::result("dashboard", &data);
        return Ok(());
    }

    for card in &data.card_items {
        print_card(card);
    }
    if !data.errors.is_empty() {
        output::section("Degraded");
        for err in &data.errors {
            output::field(&err.section, output::muted(&err.message));
        }
    }
    Ok(())
}

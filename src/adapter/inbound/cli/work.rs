//! Handler for `work`.

use tabled::Tabled;

use crate::adapter::inbound::cli::command::WorkArgs;
use crate::adapter::inbound::cli::output;
use crate::application::work::WorkPoller;
use crate::domain::work::{ClusterSelector, WorkItem, WorkRequest};
use crate::error::Result;

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&WorkItem> for ItemRow {
    fn from(item: &WorkItem) -> Self {
        match item {
            WorkItem::Resource(resource) => Self {
                cluster: resource.cluster.clone(),
                name: resource.name.clone(),
                detail: resource
                    .fields
                    .get("status")
                    .and_then(|status| status.as_str())
                    .unwrap_or_default()
                    .to_string(),
            },
            WorkItem::ClusterError { cluster, error } => Self {
                cluster: cluster.clone(),
                name: output::muted("(error)"),
                detail: error.to_string(),
            },
        }
    }
}

/// Build the request described by `args`.
#[must_use]
pub fn build_request(args: &WorkArgs, client_id: &str) -> WorkRequest {
    let mut selector = if args.clusters.is_empty() {
        ClusterSelector::all_healthy()
    } else {
        ClusterSelector::named(args.clusters.clone())
    };
    if !args.labels.is_empty() {
        selector.labels = Some(args.labels.clone());
    }

    WorkRequest::new(&args.resource)
        .with_destination(selector)
        .with_operation(&args.operation)
        .with_client_id(client_id)
        .with_dry_run(args.dry_run)
}

/// Execute `work`.
pub async fn execute(poller: &WorkPoller, args: &WorkArgs, client_id: &str) -> Result<()> {
    let request = build_request(args, client_id);
    let items = poller.submit_and_await(&request).await?;

    if output::is_json() {
        let values: Vec<_> = items.iter().map(WorkItem::to_value).collect();
        output::result("work", &values);
        return Ok(());
    }

    output::section(&format!("{} {}", args.operation, output::highlight(&args.resource)));
    if items.is_empty() {
        output::note("(no items)");
        return Ok(());
    }
    output::table(items.iter().map(ItemRow::from));
    let errors = items.iter().filter(|item| item.is_error()).count();
    if errors > 0 {
        output::warning(&format!("{errors} cluster(s) reported an error"));
    }
    Ok(())
}

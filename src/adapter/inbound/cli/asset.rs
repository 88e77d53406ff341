//! Handlers for the `asset` command group.

use serde_json::{json, Value};
use tabled::Tabled;

use crate::adapter::inbound::cli::command::{AssetArgs, AssetTarget, DeleteArgs};
use crate::adapter::inbound::cli::output;
use crate::application::provisioning::{parse_targets, AssetProvisioner};
use crate::domain::asset::{AssetRecord, AssetRef, AssetSpec};
use crate::domain::error::OrchestrationError;
use crate::domain::provisioning::{ProvisioningOutcome, StepRecord, StepResult};
use crate::error::{Error, Result};

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "Step")]
    step: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Result")]
    result: String,
}

impl From<&StepRecord> for StepRow {
    fn from(record: &StepRecord) -> Self {
        let result = match &record.result {
            StepResult::Returned { reply } if reply.is_failure() => format!(
                "{} {}",
                reply.code().map_or_else(String::new, |code| code.to_string()),
                reply.message().unwrap_or_default()
            ),
            StepResult::Returned { reply } => reply.name().unwrap_or("ok").to_string(),
            StepResult::Unreachable { message } => message.clone(),
            StepResult::Skipped => output::muted("skipped"),
        };
        Self {
            step: record.kind.to_string(),
            path: record.target.clone(),
            result,
        }
    }
}

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "BMC address")]
    address: String,
    #[tabled(rename = "Credentials")]
    credentials: String,
}

impl From<&AssetRecord> for AssetRow {
    fn from(record: &AssetRecord) -> Self {
        let text = |value: Option<&Value>| value.and_then(Value::as_str).unwrap_or_default().to_string();
        Self {
            namespace: text(record.metadata.get("namespace")),
            name: record.name().unwrap_or_default().to_string(),
            address: text(record.spec.pointer("/bmc/address")),
            credentials: record.credentials_name.clone().unwrap_or_default(),
        }
    }
}

fn spec_from(args: &AssetArgs) -> AssetSpec {
    AssetSpec {
        namespace: args.target.namespace.clone(),
        name: args.target.name.clone(),
        bmc_address: args.bmc_address.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
        boot_mac: args.boot_mac.clone(),
    }
}

fn report(outcome: ProvisioningOutcome) -> Result<()> {
    if output::is_json() {
        output::result("provisioning", &outcome);
    } else {
        output::section(&format!("{:?} finished with {}", outcome.kind, outcome.status_code));
        output::table(outcome.steps.iter().map(StepRow::from));
    }

    if outcome.is_success() {
        return Ok(());
    }
    let err = outcome.failure.unwrap_or(OrchestrationError::RemoteOperationFailed {
        code: Some(outcome.status_code),
        message: format!("workflow ended with status {}", outcome.status_code),
        payload: Value::Null,
    });
    Err(err.into())
}

/// Execute `asset create`.
pub async fn execute_create(provisioner: &AssetProvisioner, args: &AssetArgs) -> Result<()> {
    report(provisioner.create(&spec_from(args)).await)
}

/// Execute `asset update`.
pub async fn execute_update(provisioner: &AssetProvisioner, args: &AssetArgs) -> Result<()> {
    report(provisioner.update(&spec_from(args)).await)
}

/// Execute `asset get`.
pub async fn execute_get(provisioner: &AssetProvisioner, target: &AssetTarget) -> Result<()> {
    let target = AssetRef::new(&target.namespace, &target.name);
    let Some(record) = provisioner.get(&target).await? else {
        return Err(OrchestrationError::DependencyMissing {
            what: format!("asset {target} not found"),
        }
        .into());
    };

    if output::is_json() {
        output::result("asset", &record);
        return Ok(());
    }
    output::section(&target.to_string());
    output::table([AssetRow::from(&record)]);
    if let Some(username) = &record.bmc.username {
        output::field("Username", username);
    }
    if record.bmc.password.is_some() {
        output::field("Password", output::muted("(set)"));
    }
    Ok(())
}

/// Execute `asset list`.
pub async fn execute_list(provisioner: &AssetProvisioner, name: Option<&str>) -> Result<()> {
    let records = provisioner.list(name).await?;

    if output::is_json() {
        output::result("assets", &records);
        return Ok(());
    }
    output::section(&format!("{} asset(s)", records.len()));
    if !records.is_empty() {
        output::table(records.iter().map(AssetRow::from));
    }
    Ok(())
}

/// Execute `asset subresources`.
pub async fn execute_subresources(
    provisioner: &AssetProvisioner,
    target: &AssetTarget,
) -> Result<()> {
    let target = AssetRef::new(&target.namespace, &target.name);
    let subresources = provisioner.subresources(&target).await?;
    output::result("subresources", &subresources);
    Ok(())
}

/// Read delete targets from `--file` or `namespace/name` arguments.
///
/// # Errors
///
/// Returns [`OrchestrationError::InputInvalid`] for malformed targets.
pub fn read_targets(args: &DeleteArgs) -> Result<Vec<AssetRef>> {
    let input = match &args.file {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Value::Array(
            args.targets
                .iter()
                .map(|raw| match raw.split_once('/') {
                    Some((namespace, name)) => json!({"namespace": namespace, "name": name}),
                    None => json!({"name": raw}),
                })
                .collect(),
        ),
    };
    Ok(parse_targets(&input)?)
}

/// Execute `asset delete`.
pub async fn execute_delete(provisioner: &AssetProvisioner, args: &DeleteArgs) -> Result<()> {
    let targets = read_targets(args)?;
    let outcome = provisioner.delete_assets(&targets).await;

    if output::is_json() {
        output::result("delete", &outcome);
    } else if outcome.is_success() {
        output::success(&format!(
            "Deleted {} asset(s) in {} batch(es)",
            outcome.deleted, outcome.batches
        ));
    } else {
        for failure in &outcome.errors {
            output::field(&failure.target.to_string(), format!("{} {}", failure.status_code, failure.message));
        }
    }

    outcome.into_result().map(|_| ()).map_err(Error::from)
}

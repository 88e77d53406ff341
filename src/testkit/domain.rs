//! Builders for domain inputs and remote payloads.

use serde_json::{json, Value};

use crate::domain::asset::AssetSpec;

/// An asset spec with fixed BMC details.
pub fn asset_spec(namespace: &str, name: &str) -> AssetSpec {
    AssetSpec {
        namespace: namespace.into(),
        name: name.into(),
        bmc_address: "redfish://10.0.0.9".into(),
        username: "admin".into(),
        password: "s3cret".into(),
        boot_mac: "00:1a:2b:3c:4d:5e".into(),
    }
}

/// A stored asset as the resource API returns it.
pub fn stored_asset(namespace: &str, name: &str, credentials: Option<&str>) -> Value {
    json!({
        "apiVersion": "midas.io/v1alpha1",
        "kind": "BareMetalAsset",
        "metadata": {"name": name, "namespace": namespace, "uid": format!("uid-{name}")},
        "spec": {
            "bmc": {"address": "redfish://old", "credentialsName": credentials.unwrap_or_default()},
            "bootMACAddress": "00:00:00:00:00:00",
            "role": "worker",
        },
    })
}

/// A status object as returned for failed calls.
pub fn status_failure(code: u16, message: &str) -> Value {
    json!({"kind": "Status", "status": "Failure", "code": code, "message": message})
}

/// The JSON-encoded progress envelope carried in a status `RetString`.
pub fn progress(completed: bool, results: Value) -> String {
    json!({"Result": {"Completed": completed, "Results": results}}).to_string()
}

/// A cluster item for dashboard groups.
pub fn cluster(name: &str, status: &str) -> Value {
    json!({"metadata": {"name": name}, "ip": format!("10.0.0.{}", name.len()), "status": status, "clusterip": "172.30.0.1"})
}

/// A cluster status item with utilization figures.
pub fn cluster_usage(name: &str, cpu: f64, memory: f64, storage: f64) -> Value {
    json!({
        "metadata": {"name": name},
        "ip": "10.0.0.1",
        "cpuUtilization": cpu,
        "memoryUtilization": memory,
        "storageUtilization": storage,
    })
}

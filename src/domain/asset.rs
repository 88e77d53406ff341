//! Bare-metal asset resources and their BMC credentials.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const ASSET_KIND: &str = "BareMetalAsset";

/// Suffix prefix for generated credential secret names.
pub const SECRET_NAME_INFIX: &str = "-bmc-secret-";

/// Namespace + name of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub namespace: String,
    pub name: String,
}

impl AssetRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Caller input for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSpec {
    pub namespace: String,
    pub name: String,
    pub bmc_address: String,
    pub username: String,
    pub password: String,
    pub boot_mac: String,
}

impl AssetSpec {
    pub fn asset_ref(&self) -> AssetRef {
        AssetRef::new(&self.namespace, &self.name)
    }

    /// `generateName` for the credential secret.
    pub fn secret_prefix(&self) -> String {
        format!("{}{SECRET_NAME_INFIX}", self.name)
    }

    /// Base64-encoded `data` block for the secret.
    pub fn secret_data(&self) -> Value {
        json!({
            "username": general_purpose::STANDARD.encode(&self.username),
            "password": general_purpose::STANDARD.encode(&self.password),
        })
    }

    /// Secret body with a generated name and no owners yet.
    pub fn secret_body(&self) -> Value {
        json!({
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": {
                "generateName": self.secret_prefix(),
                "ownerReferences": [],
            },
            "type": "Opaque",
            "data": self.secret_data(),
        })
    }

    /// Asset body referencing `credentials_name`.
    pub fn asset_body(&self, api_version: &str, credentials_name: &str) -> Value {
        json!({
            "apiVersion": api_version,
            "kind": ASSET_KIND,
            "metadata": { "name": self.name },
            "spec": {
                "bmc": {
                    "address": self.bmc_address,
                    "credentialsName": credentials_name,
                },
                "bootMACAddress": self.boot_mac,
            },
        })
    }

    /// `old_spec` with the bmc block and boot MAC replaced.
    pub fn merged_spec(&self, old_spec: &Value, credentials_name: &str) -> Value {
        let mut spec = match old_spec {
            Value::Object(fields) => fields.clone(),
            _ => Map::new(),
        };
        spec.insert(
            "bmc".into(),
            json!({ "address": self.bmc_address, "credentialsName": credentials_name }),
        );
        spec.insert("bootMACAddress".into(), Value::String(self.boot_mac.clone()));
        Value::Object(spec)
    }
}

/// Owner reference pointing a secret back at its asset.
pub fn owner_reference(api_version: &str, owner_name: &str, owner_uid: &str) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": ASSET_KIND,
        "name": owner_name,
        "uid": owner_uid,
    })
}

/// Decoded BMC login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmcCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl BmcCredentials {
    /// Decode the `data` block of a secret. Undecodable fields are dropped.
    pub fn from_secret(secret: &Value) -> Self {
        let field = |key: &str| {
            secret
                .pointer(&format!("/data/{key}"))
                .and_then(Value::as_str)
                .and_then(|encoded| general_purpose::STANDARD.decode(encoded).ok())
                .and_then(|bytes| String::from_utf8(bytes).ok())
        };
        Self {
            username: field("username"),
            password: field("password"),
        }
    }
}

/// Display record for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub metadata: Value,
    pub spec: Value,
    pub credentials_name: Option<String>,
    pub bmc: BmcCredentials,
}

impl AssetRecord {
    /// Build from a raw asset and, if read, its credential secret.
    pub fn from_raw(asset: &Value, secret: Option<&Value>) -> Self {
        let spec = asset.get("spec").cloned().unwrap_or(Value::Null);
        Self {
            metadata: asset.get("metadata").cloned().unwrap_or(Value::Null),
            credentials_name: credentials_name(asset).map(str::to_string),
            spec,
            bmc: secret.map(BmcCredentials::from_secret).unwrap_or_default(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }
}

/// `spec.bmc.credentialsName`, if set and non-empty.
pub fn credentials_name(asset: &Value) -> Option<&str> {
    asset
        .pointer("/spec/bmc/credentialsName")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> AssetSpec {
        AssetSpec {
            namespace: "lab".into(),
            name: "node-1".into(),
            bmc_address: "ipmi://10.0.0.5".into(),
            username: "admin".into(),
            password: "hunter2".into(),
            boot_mac: "00:11:22:33:44:55".into(),
        }
    }

    #[test]
    fn secret_body_uses_generated_name_and_base64_data() {
        let body = spec().secret_body();
        assert_eq!(body["metadata"]["generateName"], "node-1-bmc-secret-");
        assert_eq!(body["data"]["username"], "YWRtaW4=");
        assert_eq!(body["type"], "Opaque");
    }

    #[test]
    fn credentials_round_trip_through_secret() {
        let secret = json!({ "data": spec().secret_data() });
        let creds = BmcCredentials::from_secret(&secret);
        assert_eq!(creds.username.as_deref(), Some("admin"));
        assert_eq!(creds.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn merged_spec_keeps_unrelated_fields() {
        let old = json!({ "role": "worker", "bmc": { "address": "old" } });
        let merged = spec().merged_spec(&old, "node-1-bmc-secret-abc");
        assert_eq!(merged["role"], "worker");
        assert_eq!(merged["bmc"]["address"], "ipmi://10.0.0.5");
        assert_eq!(merged["bmc"]["credentialsName"], "node-1-bmc-secret-abc");
        assert_eq!(merged["bootMACAddress"], "00:11:22:33:44:55");
    }

    #[test]
    fn empty_credentials_name_counts_as_absent() {
        let asset = json!({ "spec": { "bmc": { "credentialsName": "" } } });
        assert_eq!(credentials_name(&asset), None);
    }
}

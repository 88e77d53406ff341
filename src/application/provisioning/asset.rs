//! Bare-metal asset provisioning workflows.
//!
//! Create and update are strictly sequential: each step consumes the
//! previous step's reply (the generated secret name, the asset uid). A
//! failure stops the workflow and is reported with every step's result;
//! nothing already written is rolled back.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::paths::ResourcePaths;
use super::pipeline::{Expect, Pipeline};
use crate::domain::asset::{credentials_name, owner_reference, AssetRecord, AssetRef, AssetSpec};
use crate::domain::error::OrchestrationError;
use crate::domain::provisioning::{ApiObject, ProvisioningOutcome, StepKind, WorkflowKind};
use crate::port::{PatchOp, ResourceApi};

/// Namespace names, or the error the namespace listing returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NamespaceList {
    Names(Vec<String>),
    Error { error: Value },
}

/// Everything an asset edit form needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSubresources {
    pub namespaces: NamespaceList,
    pub bare_metal_asset: Option<AssetRecord>,
}

pub struct AssetProvisioner {
    pub(super) api: Arc<dyn ResourceApi>,
    pub(super) paths: ResourcePaths,
}

impl AssetProvisioner {
    pub fn new(api: Arc<dyn ResourceApi>, paths: ResourcePaths) -> Self {
        Self { api, paths }
    }

    pub fn paths(&self) -> &ResourcePaths {
        &self.paths
    }

    /// Create the credential secret, the asset, then point the secret's
    /// owner reference at the asset.
    ///
    /// Status is 201 when all three steps return their identifying name,
    /// otherwise the code of the first step that did not.
    pub async fn create(&self, spec: &AssetSpec) -> ProvisioningOutcome {
        info!(asset = %spec.asset_ref(), "Creating bare metal asset");
        let api_version = self.paths.asset_api_version();
        let secrets_path = self.paths.secrets(&spec.namespace);
        let assets_path = self.paths.assets(&spec.namespace);
        let mut pipeline = Pipeline::new(WorkflowKind::Create);

        let secret = pipeline.record(
            StepKind::CreateSecret,
            &secrets_path,
            self.api.create(&secrets_path, &spec.secret_body()).await,
            Expect::Named,
        );
        let Some(secret_name) = secret.as_ref().and_then(ApiObject::name).map(str::to_string) else {
            return pipeline.halt(&[
                (StepKind::CreateAsset, assets_path),
                (StepKind::PatchSecretOwner, secrets_path),
            ]);
        };
        let secret_path = self.paths.secret(&spec.namespace, &secret_name);

        let asset = pipeline.record(
            StepKind::CreateAsset,
            &assets_path,
            self.api
                .create(&assets_path, &spec.asset_body(api_version, &secret_name))
                .await,
            Expect::NamedAs(&spec.name),
        );
        let Some(asset) = asset else {
            return pipeline.halt(&[(StepKind::PatchSecretOwner, secret_path)]);
        };
        let Some(uid) = asset.uid() else {
            let err = OrchestrationError::DependencyMissing {
                what: format!("asset {} has no uid", spec.asset_ref()),
            };
            pipeline.fail(err.status_code(), err);
            return pipeline.halt(&[(StepKind::PatchSecretOwner, secret_path)]);
        };

        let ops = [PatchOp::replace(
            "/metadata/ownerReferences",
            json!([owner_reference(api_version, &spec.name, uid)]),
        )];
        pipeline.record(
            StepKind::PatchSecretOwner,
            &secret_path,
            self.api.patch(&secret_path, &ops).await,
            Expect::Named,
        );

        let outcome = pipeline.finish();
        info!(asset = %spec.asset_ref(), status = outcome.status_code, "Create finished");
        outcome
    }

    /// Update an existing asset's BMC address, boot MAC and credentials.
    ///
    /// A missing asset fails with 400 before anything is written. An
    /// existing credential secret is patched in place; otherwise a new one
    /// is created and owned by the asset. Status is 200 on success,
    /// otherwise the failing step's code.
    pub async fn update(&self, spec: &AssetSpec) -> ProvisioningOutcome {
        info!(asset = %spec.asset_ref(), "Updating bare metal asset");
        let asset_path = self.paths.asset(&spec.namespace, &spec.name);
        let mut pipeline = Pipeline::new(WorkflowKind::Update);

        let current = pipeline.record(
            StepKind::ReadAsset,
            &asset_path,
            self.api.get(&asset_path).await,
            Expect::Present,
        );
        let Some(current) = current else {
            return pipeline.halt(&[]);
        };

        let secret_name = match credentials_name(current.as_value()) {
            Some(existing) => {
                let secret_path = self.paths.secret(&spec.namespace, existing);
                let ops = [PatchOp::replace("/data", spec.secret_data())];
                let patched = pipeline.record(
                    StepKind::PatchSecretData,
                    &secret_path,
                    self.api.patch(&secret_path, &ops).await,
                    Expect::Accepted,
                );
                let Some(patched) = patched else {
                    return pipeline.halt(&[(StepKind::PatchAsset, asset_path)]);
                };
                patched.name().unwrap_or(existing).to_string()
            }
            None => {
                let secrets_path = self.paths.secrets(&spec.namespace);
                let created = pipeline.record(
                    StepKind::CreateSecret,
                    &secrets_path,
                    self.api.create(&secrets_path, &spec.secret_body()).await,
                    Expect::Named,
                );
                let Some(name) = created.as_ref().and_then(ApiObject::name).map(str::to_string)
                else {
                    return pipeline.halt(&[
                        (StepKind::PatchSecretOwner, secrets_path),
                        (StepKind::PatchAsset, asset_path),
                    ]);
                };

                let secret_path = self.paths.secret(&spec.namespace, &name);
                let Some(uid) = current.uid() else {
                    let err = OrchestrationError::DependencyMissing {
                        what: format!("asset {} has no uid", spec.asset_ref()),
                    };
                    pipeline.fail(err.status_code(), err);
                    return pipeline.halt(&[
                        (StepKind::PatchSecretOwner, secret_path),
                        (StepKind::PatchAsset, asset_path),
                    ]);
                };
                let ops = [PatchOp::replace(
                    "/metadata/ownerReferences",
                    json!([owner_reference(self.paths.asset_api_version(), &spec.name, uid)]),
                )];
                let owned = pipeline.record(
                    StepKind::PatchSecretOwner,
                    &secret_path,
                    self.api.patch(&secret_path, &ops).await,
                    Expect::Accepted,
                );
                if owned.is_none() {
                    return pipeline.halt(&[(StepKind::PatchAsset, asset_path)]);
                }
                name
            }
        };

        let old_spec = current.as_value().get("spec").cloned().unwrap_or(Value::Null);
        let ops = [PatchOp::replace("/spec", spec.merged_spec(&old_spec, &secret_name))];
        pipeline.record(
            StepKind::PatchAsset,
            &asset_path,
            self.api.patch(&asset_path, &ops).await,
            Expect::Accepted,
        );

        let outcome = pipeline.finish();
        info!(asset = %spec.asset_ref(), status = outcome.status_code, "Update finished");
        outcome
    }

    /// Read one asset and decode its BMC credentials.
    ///
    /// `Ok(None)` when the asset does not exist. A credential secret that
    /// cannot be read leaves the credentials empty.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::Transport`] if the resource API is unreachable.
    pub async fn get(&self, target: &AssetRef) -> Result<Option<AssetRecord>, OrchestrationError> {
        let asset = ApiObject::from(
            self.api
                .get(&self.paths.asset(&target.namespace, &target.name))
                .await?,
        );
        if !asset.has_metadata() || asset.is_failure() {
            return Ok(None);
        }

        let secret = match credentials_name(asset.as_value()) {
            Some(name) => match self.api.get(&self.paths.secret(&target.namespace, name)).await {
                Ok(secret) => Some(secret),
                Err(err) => {
                    warn!(asset = %target, error = %err, "Failed to read asset credentials");
                    None
                }
            },
            None => None,
        };
        Ok(Some(AssetRecord::from_raw(asset.as_value(), secret.as_ref())))
    }

    /// List every asset, optionally only those named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::RemoteOperationFailed`] when the listing
    /// itself is an error status.
    pub async fn list(&self, name: Option<&str>) -> Result<Vec<AssetRecord>, OrchestrationError> {
        let reply = ApiObject::from(self.api.get(&self.paths.all_assets()).await?);
        if reply.is_failure() {
            return Err(OrchestrationError::from_payload(reply.0));
        }

        let records = reply
            .as_value()
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| AssetRecord::from_raw(item, None))
                    .filter(|record| name.map_or(true, |wanted| record.name() == Some(wanted)))
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    /// Fetch the namespace list and one asset concurrently.
    ///
    /// # Errors
    ///
    /// Fails only if reading the asset fails; a failed namespace listing is
    /// reported inside [`NamespaceList::Error`].
    pub async fn subresources(
        &self,
        target: &AssetRef,
    ) -> Result<AssetSubresources, OrchestrationError> {
        let namespaces_path = self.paths.namespaces();
        let (namespaces, asset) = tokio::join!(self.api.get(&namespaces_path), self.get(target));

        let namespaces = match namespaces {
            Ok(reply) => match reply.get("items").and_then(Value::as_array) {
                Some(items) => NamespaceList::Names(
                    items
                        .iter()
                        .filter_map(|ns| ns.pointer("/metadata/name").and_then(Value::as_str))
                        .map(str::to_string)
                        .collect(),
                ),
                None => NamespaceList::Error { error: reply },
            },
            Err(err) => NamespaceList::Error {
                error: Value::String(err.to_string()),
            },
        };

        Ok(AssetSubresources {
            namespaces,
            bare_metal_asset: asset?,
        })
    }
}

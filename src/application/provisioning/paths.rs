//! Resource API paths for assets, secrets and namespaces.

/// Default API group/version serving `BareMetalAsset`.
pub const DEFAULT_ASSET_GROUP: &str = "midas.io/v1alpha1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    asset_group: String,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_GROUP)
    }
}

impl ResourcePaths {
    pub fn new(asset_group: impl Into<String>) -> Self {
        Self {
            asset_group: asset_group.into(),
        }
    }

    /// `apiVersion` written into asset bodies and owner references.
    pub fn asset_api_version(&self) -> &str {
        &self.asset_group
    }

    pub fn namespaces(&self) -> String {
        "/api/v1/namespaces".into()
    }

    pub fn secrets(&self, namespace: &str) -> String {
        format!("/api/v1/namespaces/{namespace}/secrets")
    }

    pub fn secret(&self, namespace: &str, name: &str) -> String {
        format!("{}/{name}", self.secrets(namespace))
    }

    pub fn all_assets(&self) -> String {
        format!("/apis/{}/baremetalassets", self.asset_group)
    }

    pub fn assets(&self, namespace: &str) -> String {
        format!("/apis/{}/namespaces/{namespace}/baremetalassets", self.asset_group)
    }

    pub fn asset(&self, namespace: &str, name: &str) -> String {
        format!("{}/{name}", self.assets(namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_resource_api_layout() {
        let paths = ResourcePaths::default();
        assert_eq!(paths.secret("lab", "s1"), "/api/v1/namespaces/lab/secrets/s1");
        assert_eq!(
            paths.asset("lab", "node-1"),
            "/apis/midas.io/v1alpha1/namespaces/lab/baremetalassets/node-1"
        );
        assert_eq!(paths.all_assets(), "/apis/midas.io/v1alpha1/baremetalassets");
    }
}

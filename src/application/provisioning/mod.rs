//! Multi-step provisioning against the resource API.

mod asset;
mod bulk;
mod paths;
mod pipeline;

pub use asset::{AssetProvisioner, AssetSubresources, NamespaceList};
pub use bulk::{parse_targets, BULK_BATCH_SIZE};
pub use paths::{ResourcePaths, DEFAULT_ASSET_GROUP};

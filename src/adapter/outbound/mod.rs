//! Outbound adapters (driven side).

pub mod hcm;
pub mod kube;

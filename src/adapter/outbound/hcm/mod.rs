//! Work manager adapter.

mod client;

pub use client::HcmClient;

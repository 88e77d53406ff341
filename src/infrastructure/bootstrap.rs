//! Composition root: wires the HTTP adapters into the application services.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::hcm::HcmClient;
use crate::adapter::outbound::kube::KubeClient;
use crate::application::dashboard::{DashboardAggregator, DashboardSources};
use crate::application::provisioning::AssetProvisioner;
use crate::application::work::WorkPoller;
use crate::infrastructure::config::Config;
use crate::port::{ResourceApi, WorkManager};

/// Application services built from one [`Config`].
pub struct Services {
    pub poller: Arc<WorkPoller>,
    pub provisioner: AssetProvisioner,
    pub aggregator: DashboardAggregator,
    pub sources: DashboardSources,
}

#[must_use]
pub fn build_work_manager(config: &Config) -> Arc<dyn WorkManager> {
    Arc::new(HcmClient::with_timeout(
        config.manager.url.clone(),
        config.token.clone(),
        config.manager.poll_settings().deadline,
    ))
}

#[must_use]
pub fn build_resource_api(config: &Config) -> Arc<dyn ResourceApi> {
    Arc::new(KubeClient::new(
        config.kube.url.clone(),
        config.token.clone(),
        config.kube.request_timeout(),
    ))
}

/// Build every service against the configured endpoints.
#[must_use]
pub fn build_services(config: &Config) -> Services {
    build_services_with(config, build_work_manager(config), build_resource_api(config))
}

/// Build every service against the given ports.
#[must_use]
pub fn build_services_with(
    config: &Config,
    manager: Arc<dyn WorkManager>,
    resources: Arc<dyn ResourceApi>,
) -> Services {
    let poller = Arc::new(WorkPoller::new(manager, config.manager.poll_settings()));
    let sources = DashboardSources::from_poller(Arc::clone(&poller), &config.manager.client_id);
    debug!(
        manager = %config.manager.url,
        kube = %config.kube.url,
        authenticated = config.token.is_some(),
        "Services built"
    );
    Services {
        provisioner: AssetProvisioner::new(resources, config.kube.paths()),
        aggregator: DashboardAggregator::new(config.dashboard_timeout()),
        sources,
        poller,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::domain::work::WorkRequest;
    use crate::testkit::config::test_config;
    use crate::testkit::resource::FakeResourceApi;
    use crate::testkit::work::ScriptedWorkManager;

    #[test]
    fn services_follow_configured_timings() {
        let config = test_config();
        let services = build_services_with(
            &config,
            Arc::new(ScriptedWorkManager::new()),
            Arc::new(FakeResourceApi::new()),
        );

        assert_eq!(services.poller.settings().interval, Duration::from_millis(50));
        assert_eq!(services.poller.settings().deadline, Duration::from_millis(1_000));
        assert_eq!(services.aggregator.timeout(), Duration::from_millis(1_000));
        assert_eq!(services.provisioner.paths(), &config.kube.paths());
    }

    #[tokio::test(start_paused = true)]
    async fn poller_stamps_the_configured_client_id() {
        let manager = Arc::new(ScriptedWorkManager::new().completing_after(0, json!({})));
        let services = build_services_with(&test_config(), manager.clone(), Arc::new(FakeResourceApi::new()));

        services
            .poller
            .submit_and_await(&WorkRequest::new("pods").with_client_id("testkit"))
            .await
            .unwrap();
        assert_eq!(manager.submitted()[0].client_id(), "testkit");
        assert_eq!(manager.polls(), 1);
    }
}

//! Work submission, polling cadence and deadline behavior.

mod support;

use std::sync::Arc;
use std::time::Duration;

use fleetline::domain::{OrchestrationError, WorkItem, WorkRequest};
use fleetline::port::SearchQuery;
use fleetline::testkit::domain::progress;
use fleetline::testkit::work::ScriptedWorkManager;
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn deadline_expiry_times_out_and_stops_polling() {
    let manager = Arc::new(ScriptedWorkManager::new().never_completing());
    let poller = support::poller(manager.clone(), 200, 1_000);

    let started = tokio::time::Instant::now();
    let err = poller
        .submit_and_await(&WorkRequest::new("pods"))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err}");
    assert_eq!(err.status_code(), 504);
    assert_eq!(started.elapsed(), Duration::from_millis(1_000));

    let polls_at_deadline = manager.polls();
    assert!((4..=5).contains(&polls_at_deadline), "polls: {polls_at_deadline}");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(manager.polls(), polls_at_deadline, "poll issued after the deadline");
}

#[tokio::test(start_paused = true)]
async fn slow_status_reply_is_cut_off_by_the_deadline() {
    let manager = Arc::new(
        ScriptedWorkManager::new()
            .completing_after(0, json!({}))
            .with_status_delay(Duration::from_secs(30)),
    );
    let poller = support::poller(manager.clone(), 200, 1_000);

    let err = poller
        .submit_and_await(&WorkRequest::new("pods"))
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(manager.polls(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_rejected_before_submission() {
    let manager = Arc::new(ScriptedWorkManager::new().completing_after(0, json!({})));
    let poller = support::poller(manager.clone(), 0, 1_000);

    let err = poller
        .submit_and_await(&WorkRequest::new("pods"))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestrationError::InputInvalid { .. }), "got {err}");
    assert_eq!(err.status_code(), 500);
    assert!(manager.submitted().is_empty());
    assert_eq!(manager.polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_fails_without_polling() {
    let manager = Arc::new(ScriptedWorkManager::new().rejecting(json!({"message": "quota exceeded"})));
    let poller = support::poller(manager.clone(), 200, 1_000);

    let err = poller
        .submit_and_await(&WorkRequest::new("pods"))
        .await
        .unwrap_err();

    match err {
        OrchestrationError::RemoteRejected { message } => assert_eq!(message, "quota exceeded"),
        other => panic!("expected rejection, got {other}"),
    }
    assert_eq!(manager.polls(), 0);
}

#[tokio::test(start_paused = true)]
async fn completed_results_are_flattened_per_cluster() {
    let results = json!({
        "east": {"Results": {"pod-a": {"status": "Running"}, "pod-b": {"status": "Pending"}}},
        "west": {"Results": {"pod-c": {"status": "Running"}}},
        "down": {"Results": {"code": 503, "message": "cluster unreachable"}},
    });
    let manager = Arc::new(ScriptedWorkManager::new().completing_after(2, results));
    let poller = support::poller(manager.clone(), 200, 5_000);

    let started = tokio::time::Instant::now();
    let items = poller
        .submit_and_await(&WorkRequest::new("pods").with_client_id("cli"))
        .await
        .unwrap();

    assert_eq!(manager.polls(), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(600));

    assert_eq!(items.len(), 4);
    let resources: Vec<_> = items.iter().filter(|item| !item.is_error()).collect();
    assert_eq!(resources.len(), 3);

    let errors: Vec<_> = items.iter().filter(|item| item.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].cluster(), "down");

    let pod_a = items
        .iter()
        .find_map(|item| match item {
            WorkItem::Resource(resource) if resource.name == "pod-a" => Some(item.to_value()),
            _ => None,
        })
        .expect("pod-a present");
    assert_eq!(pod_a["cluster"], "east");
    assert_eq!(pod_a["name"], "pod-a");
    assert_eq!(pod_a["status"], "Running");

    let submitted = manager.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].client_id(), "cli");
}

#[tokio::test(start_paused = true)]
async fn completed_error_payload_is_a_remote_failure() {
    let manager = Arc::new(
        ScriptedWorkManager::new().completing_after(0, json!({"code": 403, "message": "forbidden"})),
    );
    let poller = support::poller(manager, 200, 1_000);

    let err = poller
        .submit_and_await(&WorkRequest::new("secrets"))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestrationError::RemoteOperationFailed { code: Some(403), .. }));
    assert_eq!(err.status_code(), 403);
}

#[tokio::test(start_paused = true)]
async fn undecodable_status_is_not_retried() {
    let manager = Arc::new(
        ScriptedWorkManager::new().with_statuses(vec!["<html>bad gateway</html>".into(), progress(true, json!({}))]),
    );
    let poller = support::poller(manager.clone(), 200, 5_000);

    let err = poller
        .submit_and_await(&WorkRequest::new("pods"))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestrationError::MalformedResponse(_)));
    assert_eq!(manager.polls(), 1);
}

#[tokio::test(start_paused = true)]
async fn search_returns_the_manager_reply() {
    let manager = Arc::new(ScriptedWorkManager::new().with_search_reply(json!({"charts": ["nginx"]})));
    let poller = support::poller(manager, 200, 1_000);

    let reply = poller.search(&SearchQuery::new("repo", "stable")).await.unwrap();
    assert_eq!(reply["charts"], json!(["nginx"]));
}

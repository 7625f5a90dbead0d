//! Integration tests for the dispatch daemon and service facade.
//!
//! These tests verify the channel boundary end to end:
//! - Responses routed to the right callers under concurrency
//! - Inline jobs blocking only their own handling context
//! - Dropped callers not wedging the daemon
//! - Failure outcomes travelling through the service unchanged
//! - Clean shutdown

use offload::dispatcher::{DispatcherConfig, FailureKind};
use offload::service::{ComputeJob, DaemonConfig, DispatchDaemon, OffloadService};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn fast_daemon_config() -> DaemonConfig {
    DaemonConfig {
        dispatcher: DispatcherConfig {
            max_input: 93,
            timeout: Duration::from_secs(10),
            join_grace: Duration::from_secs(2),
        },
        channel_capacity: 16,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_daemon_routes_concurrent_responses_correctly() {
    let (daemon, request_tx) = DispatchDaemon::new(fast_daemon_config());
    let shutdown = CancellationToken::new();
    let daemon_task = tokio::spawn(daemon.run(shutdown.clone()));

    // Submit all jobs before collecting any response; each receiver must
    // get the value for its own input regardless of completion order.
    let mut receivers = Vec::new();
    for n in [0u64, 1, 5, 10, 20] {
        let (job, rx) = ComputeJob::isolated(n);
        request_tx.send(job).await.unwrap();
        receivers.push((n, rx));
    }

    for (n, rx) in receivers {
        let response = rx.await.unwrap();
        let expected = offload::kernel::fib(n);
        assert_eq!(response.value(), Some(expected), "fib({})", n);
    }

    shutdown.cancel();
    let _ = daemon_task.await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_inline_job_blocks_only_its_own_context() {
    let (daemon, request_tx) = DispatchDaemon::new(fast_daemon_config());
    let shutdown = CancellationToken::new();
    let daemon_task = tokio::spawn(daemon.run(shutdown.clone()));

    // The inline job monopolizes one handling context for a while...
    let (inline_job, inline_rx) = ComputeJob::inline(35);
    request_tx.send(inline_job).await.unwrap();

    // ...but an isolated job submitted right after still completes promptly.
    let (isolated_job, isolated_rx) = ComputeJob::isolated(10);
    request_tx.send(isolated_job).await.unwrap();

    let isolated = tokio::time::timeout(Duration::from_secs(5), isolated_rx)
        .await
        .expect("isolated job must not be starved by the inline job")
        .unwrap();
    assert_eq!(isolated.value(), Some(55));

    let inline = inline_rx.await.unwrap();
    assert_eq!(inline.value(), Some(offload::kernel::fib(35)));

    shutdown.cancel();
    let _ = daemon_task.await;
}

#[tokio::test]
async fn test_dropped_caller_does_not_wedge_daemon() {
    let (daemon, request_tx) = DispatchDaemon::new(fast_daemon_config());
    let shutdown = CancellationToken::new();
    let daemon_task = tokio::spawn(daemon.run(shutdown.clone()));

    let (job, response_rx) = ComputeJob::isolated(10);
    request_tx.send(job).await.unwrap();
    drop(response_rx);

    // The daemon must keep serving after the orphaned response send fails.
    let (job, rx) = ComputeJob::isolated(5);
    request_tx.send(job).await.unwrap();
    assert_eq!(rx.await.unwrap().value(), Some(5));

    shutdown.cancel();
    let _ = daemon_task.await;
}

#[tokio::test]
async fn test_service_failure_outcomes_pass_through() {
    let service = OffloadService::start(DaemonConfig {
        dispatcher: DispatcherConfig {
            max_input: 20,
            timeout: Duration::from_millis(50),
            join_grace: Duration::from_secs(2),
        },
        channel_capacity: 16,
    });

    // Oversized input: client-side failure, resolved synchronously.
    let response = service.compute_isolated(21).await.unwrap();
    assert!(matches!(
        response.outcome.failure_kind(),
        Some(FailureKind::InvalidInput { .. })
    ));

    // Valid input still works on the same service afterwards.
    let response = service.compute_isolated(10).await.unwrap();
    assert_eq!(response.value(), Some(55));

    service.shutdown().await;
}

#[tokio::test]
async fn test_service_timeout_travels_as_outcome() {
    let service = OffloadService::start(DaemonConfig {
        dispatcher: DispatcherConfig {
            max_input: 93,
            timeout: Duration::from_millis(50),
            join_grace: Duration::from_secs(5),
        },
        channel_capacity: 16,
    });

    let response = service.compute_isolated(90).await.unwrap();
    assert!(matches!(
        response.outcome.failure_kind(),
        Some(FailureKind::Timeout { .. })
    ));

    service.shutdown().await;
}

#[tokio::test]
async fn test_service_modes_agree() {
    let service = OffloadService::start(fast_daemon_config());

    for n in [0u64, 1, 10] {
        let inline = service.compute_inline(n).await.unwrap();
        let isolated = service.compute_isolated(n).await.unwrap();
        assert_eq!(inline.value(), isolated.value(), "fib({})", n);
    }

    service.shutdown().await;
}

#[tokio::test]
async fn test_service_shutdown_completes() {
    let service = OffloadService::start(fast_daemon_config());
    let response = service.compute_isolated(10).await.unwrap();
    assert!(response.is_success());

    // Must return, not hang.
    tokio::time::timeout(Duration::from_secs(2), service.shutdown())
        .await
        .expect("shutdown should complete promptly");
}

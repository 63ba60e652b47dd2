//! Wait-primitive timing behavior.
//!
//! Runs with paused time so a 600-second default budget is not a 600
//! second test; sleeps auto-advance the clock.

mod support;

use std::time::Duration;

use fleetsvc_api::{DesiredState, UnitDefinition};
use fleetsvc_reconcile::{LifecycleClient, ReconcileError, WaitConfig};

use support::{MockScheduler, UNIT_FILE};

fn wait_config(poll_ms: u64, timeout_ms: u64) -> WaitConfig {
    WaitConfig {
        poll_interval: Duration::from_millis(poll_ms),
        timeout: Duration::from_millis(timeout_ms),
    }
}

#[tokio::test(start_paused = true)]
async fn wait_times_out_when_state_never_converges() {
    let mock = MockScheduler::frozen();
    let client = LifecycleClient::with_wait_config(mock.clone(), wait_config(100, 1000));
    let definition = UnitDefinition::parse(UNIT_FILE).unwrap();

    let err = client
        .create_unit_and_wait("web@1.service", DesiredState::Launched, &definition)
        .await
        .unwrap_err();

    let ReconcileError::Timeout { unit, elapsed, .. } = err else {
        panic!("expected timeout, got {:?}", err);
    };
    assert_eq!(unit, "web@1.service");
    assert!(elapsed >= Duration::from_millis(1000));

    // The full poll budget must be spent: roughly timeout / interval
    // observation attempts, never fewer.
    assert!(
        mock.list_unit_calls() >= 10,
        "only {} polls before timeout",
        mock.list_unit_calls()
    );
}

#[tokio::test(start_paused = true)]
async fn wait_succeeds_immediately_on_converged_state() {
    let mock = MockScheduler::new();
    let client = LifecycleClient::with_wait_config(mock.clone(), wait_config(100, 1000));
    let definition = UnitDefinition::parse(UNIT_FILE).unwrap();

    client
        .create_unit_and_wait("web@1.service", DesiredState::Launched, &definition)
        .await
        .unwrap();

    // One scheduler-state poll; the systemd wait uses the state listing.
    assert_eq!(mock.list_unit_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn destroy_wait_observes_absence() {
    let mock = MockScheduler::new();
    mock.seed_unit("web@1.service", DesiredState::Launched);
    let client = LifecycleClient::with_wait_config(mock.clone(), wait_config(100, 1000));

    client.destroy_unit_and_wait("web@1.service").await.unwrap();
    assert!(mock.unit_names().is_empty());
}

//! Decommission behavior against the in-memory scheduler.

mod support;

use fleetsvc_api::DesiredState;
use fleetsvc_reconcile::{LifecycleClient, ReconcileError, ServiceReconciler};

use support::{MockScheduler, Op, UNIT_FILE};

fn reconciler(mock: &MockScheduler) -> ServiceReconciler<MockScheduler> {
    ServiceReconciler::new(LifecycleClient::new(mock.clone()))
}

#[tokio::test]
async fn decommission_removes_everything_descending() {
    let mock = MockScheduler::new();
    let reconciler = reconciler(&mock);

    reconciler.converge("web", UNIT_FILE, 3).await.unwrap();
    mock.clear_ops();

    reconciler.decommission("web").await.unwrap();

    assert!(mock.unit_names().is_empty());
    assert_eq!(
        mock.ops(),
        vec![
            Op::Destroy("web@.service".to_string()),
            Op::Destroy("web@3.service".to_string()),
            Op::Destroy("web@2.service".to_string()),
            Op::Destroy("web@1.service".to_string()),
        ]
    );
}

#[tokio::test]
async fn decommission_unknown_service_is_an_error() {
    let mock = MockScheduler::new();
    let reconciler = reconciler(&mock);

    let err = reconciler.decommission("web").await.unwrap_err();
    assert!(matches!(err, ReconcileError::NoInstances(service) if service == "web"));
    assert!(mock.ops().is_empty());
}

#[tokio::test]
async fn decommission_sweeps_foreign_and_legacy_units() {
    let mock = MockScheduler::new();
    mock.seed_unit("web.service", DesiredState::Launched);
    mock.seed_unit("web@canary.service", DesiredState::Launched);
    mock.seed_unit("web@1.service", DesiredState::Launched);
    let reconciler = reconciler(&mock);

    reconciler.decommission("web").await.unwrap();

    assert!(mock.unit_names().is_empty());
    assert_eq!(
        mock.ops(),
        vec![
            Op::Destroy("web@canary.service".to_string()),
            Op::Destroy("web.service".to_string()),
            Op::Destroy("web@1.service".to_string()),
        ]
    );
}

#[tokio::test]
async fn decommission_template_only_service_succeeds() {
    let mock = MockScheduler::new();
    mock.seed_unit("web@.service", DesiredState::Inactive);
    let reconciler = reconciler(&mock);

    reconciler.decommission("web").await.unwrap();
    assert!(mock.unit_names().is_empty());
}

#[tokio::test]
async fn decommission_does_not_touch_other_services() {
    let mock = MockScheduler::new();
    mock.seed_unit("web@.service", DesiredState::Inactive);
    mock.seed_unit("web@1.service", DesiredState::Launched);
    mock.seed_unit("api@1.service", DesiredState::Launched);
    let reconciler = reconciler(&mock);

    reconciler.decommission("web").await.unwrap();

    assert_eq!(mock.unit_names(), vec!["api@1.service"]);
}

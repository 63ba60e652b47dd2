//! Unit lifecycle client.
//!
//! Thin wrapper around [`SchedulerApi`] that turns the scheduler's
//! eventually-consistent transitions into synchronous, deadline-bounded
//! calls. The scheduler has no blocking or event-subscription mode, so
//! the only synchronization primitive is a fixed-interval poll against
//! fresh list results.
//!
//! Every state-changing operation here blocks its caller until the
//! scheduler has externally confirmed the transition or the wait deadline
//! passes. Nothing is fire-and-forget, nothing is retried: the first
//! remote failure propagates immediately.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use fleetsvc_api::{
    CurrentState, DesiredState, Machine, SchedulerApi, SystemdActiveState, Unit, UnitDefinition,
    UnitStateRecord,
};

use crate::error::ReconcileError;

/// Default interval between state polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default total budget per convergence wait.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Polling parameters for convergence waits.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    /// Interval between polls.
    pub poll_interval: Duration,

    /// Total budget per wait; exceeding it is a fatal
    /// [`ReconcileError::Timeout`].
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

/// CRUD plus convergence-waiting over the remote unit API.
pub struct LifecycleClient<S> {
    api: S,
    wait: WaitConfig,
}

impl<S: SchedulerApi> LifecycleClient<S> {
    /// Create a client with default wait parameters.
    pub fn new(api: S) -> Self {
        Self::with_wait_config(api, WaitConfig::default())
    }

    /// Create a client with explicit wait parameters.
    pub fn with_wait_config(api: S, wait: WaitConfig) -> Self {
        Self { api, wait }
    }

    /// Fetch the full unit inventory.
    pub async fn units(&self) -> Result<Vec<Unit>, ReconcileError> {
        Ok(self.api.list_units().await?)
    }

    /// Fetch process-manager state per unit per machine.
    pub async fn unit_states(&self) -> Result<Vec<UnitStateRecord>, ReconcileError> {
        Ok(self.api.list_unit_states().await?)
    }

    /// Fetch the cluster node inventory.
    pub async fn machines(&self) -> Result<Vec<Machine>, ReconcileError> {
        Ok(self.api.list_machines().await?)
    }

    /// Observe a unit's scheduler-level state from a fresh listing.
    /// `None` means the unit does not exist.
    async fn current_state(&self, name: &str) -> Result<Option<CurrentState>, ReconcileError> {
        let units = self.api.list_units().await?;
        Ok(units
            .iter()
            .find(|unit| unit.name == name)
            .map(|unit| unit.current_state))
    }

    /// Observe a unit's process-manager state from a fresh listing.
    /// `None` means no machine reports the unit.
    async fn systemd_state(
        &self,
        name: &str,
    ) -> Result<Option<SystemdActiveState>, ReconcileError> {
        let states = self.api.list_unit_states().await?;
        Ok(states
            .iter()
            .find(|state| state.name == name)
            .map(|state| state.systemd_active_state))
    }

    /// Poll until the unit's scheduler-level state equals `target`
    /// (`None` = absent), or the wait deadline passes.
    pub async fn wait_for_unit_state(
        &self,
        name: &str,
        target: Option<CurrentState>,
    ) -> Result<(), ReconcileError> {
        let describe = |t: Option<CurrentState>| match t {
            Some(state) => state.to_string(),
            None => "absent".to_string(),
        };
        debug!(unit = %name, target = %describe(target), "Waiting for scheduler state");

        let start = Instant::now();
        let deadline = start + self.wait.timeout;
        loop {
            if self.current_state(name).await? == target {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ReconcileError::Timeout {
                    unit: name.to_string(),
                    target: describe(target),
                    elapsed: start.elapsed(),
                });
            }
            tokio::time::sleep(self.wait.poll_interval).await;
        }
    }

    /// Poll until the unit's process-manager state equals `target`
    /// (`None` = absent), or the wait deadline passes.
    pub async fn wait_for_systemd_state(
        &self,
        name: &str,
        target: Option<SystemdActiveState>,
    ) -> Result<(), ReconcileError> {
        let describe = |t: Option<SystemdActiveState>| match t {
            Some(state) => format!("systemd {}", state),
            None => "systemd absent".to_string(),
        };
        debug!(unit = %name, target = %describe(target), "Waiting for process-manager state");

        let start = Instant::now();
        let deadline = start + self.wait.timeout;
        loop {
            if self.systemd_state(name).await? == target {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ReconcileError::Timeout {
                    unit: name.to_string(),
                    target: describe(target),
                    elapsed: start.elapsed(),
                });
            }
            tokio::time::sleep(self.wait.poll_interval).await;
        }
    }

    /// Submit a unit, then block until the scheduler reports it converged.
    ///
    /// A launched unit is converged only once its process-manager state is
    /// `active`, observed on a second, independent wait.
    pub async fn create_unit_and_wait(
        &self,
        name: &str,
        desired_state: DesiredState,
        definition: &UnitDefinition,
    ) -> Result<(), ReconcileError> {
        debug!(unit = %name, desired_state = %desired_state, "Creating unit");
        self.api
            .create_unit(name, desired_state, definition.options())
            .await?;

        let target = match desired_state {
            DesiredState::Inactive => CurrentState::Inactive,
            DesiredState::Loaded => CurrentState::Loaded,
            DesiredState::Launched => CurrentState::Launched,
        };
        self.wait_for_unit_state(name, Some(target)).await?;

        if desired_state == DesiredState::Launched {
            self.wait_for_systemd_state(name, Some(SystemdActiveState::Active))
                .await?;
        }

        Ok(())
    }

    /// Destroy a unit, then block until both the scheduler and the
    /// process manager stop reporting it.
    pub async fn destroy_unit_and_wait(&self, name: &str) -> Result<(), ReconcileError> {
        debug!(unit = %name, "Destroying unit");
        self.api.destroy_unit(name).await?;

        self.wait_for_unit_state(name, None).await?;
        self.wait_for_systemd_state(name, None).await
    }

    /// Verified destroy followed by verified create, strictly sequential.
    ///
    /// The destroy fully converges before the create is submitted, so the
    /// scheduler never observes a transient duplicate of the name.
    pub async fn destroy_and_recreate(
        &self,
        name: &str,
        desired_state: DesiredState,
        definition: &UnitDefinition,
    ) -> Result<(), ReconcileError> {
        self.destroy_unit_and_wait(name).await?;
        self.create_unit_and_wait(name, desired_state, definition)
            .await
    }
}

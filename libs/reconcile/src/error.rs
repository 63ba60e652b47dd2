//! Reconciliation errors.
//!
//! Every variant is terminal: the original tool aborted the process on
//! first failure, and this engine keeps those semantics as typed errors
//! propagated to the top-level caller. There is no retry and no rollback
//! of already-applied mutations; an operator is expected to inspect state
//! and re-invoke.

use std::time::Duration;

use thiserror::Error;

use fleetsvc_api::ApiError;

/// Errors raised by the lifecycle client and reconciler.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A remote CRUD or list call was rejected by the scheduler.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A convergence wait exceeded its deadline.
    #[error("timed out after {elapsed:?} waiting for {unit} to reach {target}")]
    Timeout {
        unit: String,
        target: String,
        elapsed: Duration,
    },

    /// Decommission was asked to remove a service with no remote state.
    #[error("no units found for service '{0}'")]
    NoInstances(String),

    /// The service name cannot participate in the naming convention.
    #[error("invalid service name '{name}': {reason}")]
    InvalidServiceName { name: String, reason: &'static str },
}

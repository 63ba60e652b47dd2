//! Service reconciliation engine.
//!
//! This library converges a templated, horizontally-scaled service against
//! its declared desired state (instance count + unit definition) on top of
//! a remote cluster scheduler. Key concepts:
//!
//! - **Desired state**: one inactive template unit plus `count` launched
//!   instance units, numbered `1..=count`.
//! - **Current state**: whatever the scheduler's unit inventory reports.
//! - **Convergence**: the ordered sequence of creates, updates, and
//!   destroys that makes current match desired, each step verified by
//!   polling before the next begins.
//!
//! # Invariants
//!
//! - Planning is deterministic given the same inventory snapshot.
//! - At most one mutation of scheduler state is in flight at a time.
//! - No state is cached between invocations; every call re-lists the
//!   full inventory.
//! - The first remote failure or wait timeout aborts the whole operation
//!   with no compensation.

mod error;
mod inventory;
mod lifecycle;
mod naming;
mod reconciler;

pub use error::ReconcileError;
pub use inventory::{
    group_by_machine, group_by_service, group_by_unit, MachineUnits, ProcessEntry, ServiceUnits,
    UnitProcesses,
};
pub use lifecycle::{LifecycleClient, WaitConfig, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT};
pub use naming::{
    instance_index, instance_unit_name, legacy_unit_name, service_of_instance, template_unit_name,
    validate_service_name,
};
pub use reconciler::{plan_convergence, ConvergencePlan, ServiceReconciler, TemplateAction};

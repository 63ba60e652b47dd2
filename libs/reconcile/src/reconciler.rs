//! Service reconciler.
//!
//! Planning and execution are split: [`plan_convergence`] is a pure
//! function of one inventory snapshot, and [`ServiceReconciler`] executes
//! the plan through the lifecycle client one fully-converged operation at
//! a time.
//!
//! The execution order is a safety property, not an implementation
//! accident:
//!
//! 1. read the full inventory once
//! 2. destroy foreign and legacy units before touching shared names
//! 3. refresh the template (destroy-and-recreate picks up content changes)
//! 4. create missing instances, ascending
//! 5. update surviving instances in place, ascending
//! 6. destroy surplus instances, **descending**, so the lowest-numbered
//!    (longest-lived) instances stay available longest

use std::collections::BTreeSet;

use tracing::{info, warn};

use fleetsvc_api::{DesiredState, SchedulerApi, Unit, UnitDefinition};

use crate::error::ReconcileError;
use crate::lifecycle::LifecycleClient;
use crate::naming;

/// What to do with the template unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateAction {
    /// No template exists; create it.
    Create,

    /// A template exists; destroy-and-recreate it to pick up content
    /// changes. This happens on every converge by design.
    Replace,
}

/// The ordered set of operations that converges one service.
///
/// Instance vectors carry instance numbers; `to_create` and `to_update`
/// are ascending, `to_destroy` is descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvergencePlan {
    pub service: String,

    /// Units matching the service's instance pattern but outside the
    /// numbering scheme. Destroyed unconditionally.
    pub foreign: Vec<String>,

    /// The legacy non-templated `<service>.service` unit, if present.
    pub legacy: Option<String>,

    pub template: TemplateAction,

    pub to_create: Vec<u32>,

    pub to_update: Vec<u32>,

    pub to_destroy: Vec<u32>,
}

impl ConvergencePlan {
    /// Whether the snapshot held any unit attributable to the service.
    pub fn found_existing(&self) -> bool {
        !self.foreign.is_empty()
            || self.legacy.is_some()
            || self.template == TemplateAction::Replace
            || !self.to_update.is_empty()
            || !self.to_destroy.is_empty()
    }
}

/// Compute the convergence plan for `service` from one inventory snapshot.
///
/// Deterministic: the same snapshot and count always yield the same plan.
pub fn plan_convergence(service: &str, desired_count: u32, inventory: &[Unit]) -> ConvergencePlan {
    let mut owned = BTreeSet::new();
    let mut foreign = Vec::new();

    for unit in inventory {
        if !naming::is_instance_of(service, &unit.name) {
            continue;
        }
        match naming::instance_index(service, &unit.name) {
            Some(n) => {
                owned.insert(n);
            }
            None => foreign.push(unit.name.clone()),
        }
    }
    foreign.sort();

    let legacy_name = naming::legacy_unit_name(service);
    let legacy = inventory
        .iter()
        .any(|unit| unit.name == legacy_name)
        .then_some(legacy_name);

    let template_name = naming::template_unit_name(service);
    let template = if inventory.iter().any(|unit| unit.name == template_name) {
        TemplateAction::Replace
    } else {
        TemplateAction::Create
    };

    let desired: BTreeSet<u32> = (1..=desired_count).collect();

    let to_create: Vec<u32> = desired.difference(&owned).copied().collect();
    let to_update: Vec<u32> = owned.intersection(&desired).copied().collect();
    let mut to_destroy: Vec<u32> = owned.difference(&desired).copied().collect();
    to_destroy.reverse();

    ConvergencePlan {
        service: service.to_string(),
        foreign,
        legacy,
        template,
        to_create,
        to_update,
        to_destroy,
    }
}

/// Drives the lifecycle client to converge services to declared state.
///
/// Holds no state between invocations; every call re-derives the full
/// picture from a fresh inventory listing. Two simultaneous
/// reconciliations of the same service are unsafe (there is no locking
/// against concurrent writers).
pub struct ServiceReconciler<S> {
    lifecycle: LifecycleClient<S>,
}

impl<S: SchedulerApi> ServiceReconciler<S> {
    /// Create a reconciler over a lifecycle client.
    pub fn new(lifecycle: LifecycleClient<S>) -> Self {
        Self { lifecycle }
    }

    /// The underlying lifecycle client.
    pub fn lifecycle(&self) -> &LifecycleClient<S> {
        &self.lifecycle
    }

    /// Converge `service` to one inactive template plus `desired_count`
    /// launched instances built from `unit_file` text.
    ///
    /// A count of 0 is valid and leaves only the template. Any remote
    /// failure or wait timeout aborts immediately, leaving the system in
    /// a partially-converged state with no rollback.
    pub async fn converge(
        &self,
        service: &str,
        unit_file: &str,
        desired_count: u32,
    ) -> Result<ConvergencePlan, ReconcileError> {
        naming::validate_service_name(service)?;
        let definition = UnitDefinition::parse(unit_file)?;

        let inventory = self.lifecycle.units().await?;
        let plan = plan_convergence(service, desired_count, &inventory);

        info!(
            service = %service,
            desired_count,
            create = plan.to_create.len(),
            update = plan.to_update.len(),
            destroy = plan.to_destroy.len(),
            foreign = plan.foreign.len(),
            "Converging service"
        );

        self.execute(&plan, Some(&definition)).await?;
        Ok(plan)
    }

    /// Remove every unit attributable to `service`.
    ///
    /// Fails with [`ReconcileError::NoInstances`] when the inventory holds
    /// nothing for the service; destroying a non-existent service is a
    /// caller error, not a no-op.
    pub async fn decommission(&self, service: &str) -> Result<ConvergencePlan, ReconcileError> {
        naming::validate_service_name(service)?;

        let inventory = self.lifecycle.units().await?;
        let plan = plan_convergence(service, 0, &inventory);

        if !plan.found_existing() {
            return Err(ReconcileError::NoInstances(service.to_string()));
        }

        info!(
            service = %service,
            destroy = plan.to_destroy.len(),
            foreign = plan.foreign.len(),
            "Decommissioning service"
        );

        self.execute(&plan, None).await?;
        Ok(plan)
    }

    /// Execute a plan in the fixed order, one converged operation at a
    /// time. `definition` is `None` when decommissioning, in which case
    /// the template is destroyed rather than refreshed.
    async fn execute(
        &self,
        plan: &ConvergencePlan,
        definition: Option<&UnitDefinition>,
    ) -> Result<(), ReconcileError> {
        for name in &plan.foreign {
            warn!(unit = %name, "Destroying foreign instance unit");
            self.lifecycle.destroy_unit_and_wait(name).await?;
        }

        if let Some(name) = &plan.legacy {
            warn!(unit = %name, "Destroying legacy non-templated unit");
            self.lifecycle.destroy_unit_and_wait(name).await?;
        }

        let template_name = naming::template_unit_name(&plan.service);
        match (definition, plan.template) {
            (Some(definition), TemplateAction::Replace) => {
                info!(unit = %template_name, "Refreshing template");
                self.lifecycle
                    .destroy_and_recreate(&template_name, DesiredState::Inactive, definition)
                    .await?;
            }
            (Some(definition), TemplateAction::Create) => {
                info!(unit = %template_name, "Creating template");
                self.lifecycle
                    .create_unit_and_wait(&template_name, DesiredState::Inactive, definition)
                    .await?;
            }
            (None, TemplateAction::Replace) => {
                info!(unit = %template_name, "Destroying template");
                self.lifecycle.destroy_unit_and_wait(&template_name).await?;
            }
            (None, TemplateAction::Create) => {}
        }

        if let Some(definition) = definition {
            for n in &plan.to_create {
                let name = naming::instance_unit_name(&plan.service, *n);
                info!(unit = %name, "Creating instance");
                self.lifecycle
                    .create_unit_and_wait(&name, DesiredState::Launched, definition)
                    .await?;
            }

            for n in &plan.to_update {
                let name = naming::instance_unit_name(&plan.service, *n);
                info!(unit = %name, "Updating instance in place");
                self.lifecycle
                    .destroy_and_recreate(&name, DesiredState::Launched, definition)
                    .await?;
            }
        }

        for n in &plan.to_destroy {
            let name = naming::instance_unit_name(&plan.service, *n);
            info!(unit = %name, "Destroying surplus instance");
            self.lifecycle.destroy_unit_and_wait(&name).await?;
        }

        Ok(())
    }
}

//! In-memory scheduler for reconciliation tests.
//!
//! Applies mutations instantly: a created unit's current state matches
//! its desired state on the next listing, and launched units report an
//! `active` process-manager record on machine `m-1`. A frozen scheduler
//! accepts mutations but never converges, for exercising wait timeouts.

// Each test binary uses a different slice of this harness.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fleetsvc_api::{
    ApiError, CurrentState, DesiredState, Machine, SchedulerApi, SystemdActiveState, Unit,
    UnitOption, UnitStateRecord,
};

/// A recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Create(String),
    Destroy(String),
}

#[derive(Default)]
struct Inner {
    units: BTreeMap<String, StoredUnit>,
    machines: Vec<Machine>,
    ops: Vec<Op>,
    list_unit_calls: usize,
    frozen: bool,
}

struct StoredUnit {
    desired: DesiredState,
    #[allow(dead_code)]
    options: Vec<UnitOption>,
}

/// Shared-handle mock scheduler.
#[derive(Clone, Default)]
pub struct MockScheduler {
    inner: Arc<Mutex<Inner>>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheduler that accepts mutations but whose observed state never
    /// changes from `inactive`.
    pub fn frozen() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().frozen = true;
        mock
    }

    pub fn add_machine(&self, id: &str, primary_ip: &str) {
        self.inner.lock().unwrap().machines.push(Machine {
            id: id.to_string(),
            primary_ip: primary_ip.to_string(),
            metadata: Default::default(),
        });
    }

    /// Seed a unit as if a previous deployment created it.
    pub fn seed_unit(&self, name: &str, desired: DesiredState) {
        self.inner.lock().unwrap().units.insert(
            name.to_string(),
            StoredUnit {
                desired,
                options: Vec::new(),
            },
        );
    }

    pub fn unit_names(&self) -> Vec<String> {
        self.inner.lock().unwrap().units.keys().cloned().collect()
    }

    pub fn desired_state(&self, name: &str) -> Option<DesiredState> {
        self.inner
            .lock()
            .unwrap()
            .units
            .get(name)
            .map(|unit| unit.desired)
    }

    pub fn ops(&self) -> Vec<Op> {
        self.inner.lock().unwrap().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.inner.lock().unwrap().ops.clear();
    }

    pub fn list_unit_calls(&self) -> usize {
        self.inner.lock().unwrap().list_unit_calls
    }
}

fn observed_state(desired: DesiredState, frozen: bool) -> CurrentState {
    if frozen {
        return CurrentState::Inactive;
    }
    match desired {
        DesiredState::Inactive => CurrentState::Inactive,
        DesiredState::Loaded => CurrentState::Loaded,
        DesiredState::Launched => CurrentState::Launched,
    }
}

#[async_trait]
impl SchedulerApi for MockScheduler {
    async fn list_units(&self) -> Result<Vec<Unit>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.list_unit_calls += 1;

        let frozen = inner.frozen;
        Ok(inner
            .units
            .iter()
            .map(|(name, unit)| Unit {
                name: name.clone(),
                desired_state: unit.desired,
                current_state: observed_state(unit.desired, frozen),
                machine_id: (unit.desired == DesiredState::Launched && !frozen)
                    .then(|| "m-1".to_string()),
            })
            .collect())
    }

    async fn list_unit_states(&self) -> Result<Vec<UnitStateRecord>, ApiError> {
        let inner = self.inner.lock().unwrap();
        if inner.frozen {
            return Ok(Vec::new());
        }

        Ok(inner
            .units
            .iter()
            .filter(|(_, unit)| unit.desired == DesiredState::Launched)
            .map(|(name, _)| UnitStateRecord {
                name: name.clone(),
                hash: None,
                machine_id: "m-1".to_string(),
                systemd_load_state: "loaded".to_string(),
                systemd_active_state: SystemdActiveState::Active,
                systemd_sub_state: "running".to_string(),
            })
            .collect())
    }

    async fn list_machines(&self) -> Result<Vec<Machine>, ApiError> {
        Ok(self.inner.lock().unwrap().machines.clone())
    }

    async fn create_unit(
        &self,
        name: &str,
        desired_state: DesiredState,
        options: &[UnitOption],
    ) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ops.push(Op::Create(name.to_string()));
        inner.units.insert(
            name.to_string(),
            StoredUnit {
                desired: desired_state,
                options: options.to_vec(),
            },
        );
        Ok(())
    }

    async fn destroy_unit(&self, name: &str) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.ops.push(Op::Destroy(name.to_string()));
        inner.units.remove(name);
        Ok(())
    }
}

/// A minimal launchable unit file.
pub const UNIT_FILE: &str = "\
[Unit]
Description=Test service

[Service]
ExecStart=/usr/bin/test-service %i
";

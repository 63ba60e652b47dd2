//! Read-only inventory views.
//!
//! Roll-ups over the scheduler's unit-state and machine listings. No
//! mutation and no waiting happens here; each view is one or two list
//! calls plus pure grouping, exposed both as free functions (for tests
//! and embedding) and as methods on [`ServiceReconciler`].

use std::collections::BTreeMap;

use fleetsvc_api::{Machine, SchedulerApi, UnitStateRecord};

use crate::error::ReconcileError;
use crate::naming;
use crate::reconciler::ServiceReconciler;

/// One (machine, sub-state) observation of a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub machine_id: String,
    pub active_state: String,
    pub sub_state: String,
}

impl From<&UnitStateRecord> for ProcessEntry {
    fn from(record: &UnitStateRecord) -> Self {
        Self {
            machine_id: record.machine_id.clone(),
            active_state: record.systemd_active_state.to_string(),
            sub_state: record.systemd_sub_state.clone(),
        }
    }
}

/// All observed process state for one service, grouped from instance
/// unit names.
#[derive(Debug, Clone)]
pub struct ServiceUnits {
    pub service: String,
    pub units: Vec<UnitProcesses>,
}

/// All observed process state for one unit name.
#[derive(Debug, Clone)]
pub struct UnitProcesses {
    pub unit: String,
    pub processes: Vec<ProcessEntry>,
}

/// A machine with the unit-state records it hosts.
#[derive(Debug, Clone)]
pub struct MachineUnits {
    pub machine: Machine,
    pub units: Vec<UnitProcesses>,
}

/// Group unit-state records by owning service.
///
/// Records whose names do not match the instance naming convention (the
/// template, legacy units, one-off units) carry no service attribution
/// and are skipped.
pub fn group_by_service(records: &[UnitStateRecord]) -> Vec<ServiceUnits> {
    let mut services: BTreeMap<String, BTreeMap<String, Vec<ProcessEntry>>> = BTreeMap::new();

    for record in records {
        let Some(service) = naming::service_of_instance(&record.name) else {
            continue;
        };
        services
            .entry(service.to_string())
            .or_default()
            .entry(record.name.clone())
            .or_default()
            .push(record.into());
    }

    services
        .into_iter()
        .map(|(service, units)| ServiceUnits {
            service,
            units: units
                .into_iter()
                .map(|(unit, processes)| UnitProcesses { unit, processes })
                .collect(),
        })
        .collect()
}

/// Group unit-state records by unit name, sorted by name.
pub fn group_by_unit(records: &[UnitStateRecord]) -> Vec<UnitProcesses> {
    let mut units: BTreeMap<String, Vec<ProcessEntry>> = BTreeMap::new();

    for record in records {
        units
            .entry(record.name.clone())
            .or_default()
            .push(record.into());
    }

    units
        .into_iter()
        .map(|(unit, processes)| UnitProcesses { unit, processes })
        .collect()
}

/// Cross-join machines with the unit-state records they host.
///
/// A machine hosting nothing yields an empty unit list, not an error.
/// Records naming an unlisted machine are dropped.
pub fn group_by_machine(machines: Vec<Machine>, records: &[UnitStateRecord]) -> Vec<MachineUnits> {
    let mut by_machine: BTreeMap<&str, BTreeMap<String, Vec<ProcessEntry>>> = BTreeMap::new();
    for record in records {
        by_machine
            .entry(record.machine_id.as_str())
            .or_default()
            .entry(record.name.clone())
            .or_default()
            .push(record.into());
    }

    machines
        .into_iter()
        .map(|machine| {
            let units = by_machine
                .remove(machine.id.as_str())
                .unwrap_or_default()
                .into_iter()
                .map(|(unit, processes)| UnitProcesses { unit, processes })
                .collect();
            MachineUnits { machine, units }
        })
        .collect()
}

impl<S: SchedulerApi> ServiceReconciler<S> {
    /// Roll up process state by service.
    pub async fn list_services(&self) -> Result<Vec<ServiceUnits>, ReconcileError> {
        let records = self.lifecycle().unit_states().await?;
        Ok(group_by_service(&records))
    }

    /// Roll up process state by machine.
    pub async fn list_machines(&self) -> Result<Vec<MachineUnits>, ReconcileError> {
        let machines = self.lifecycle().machines().await?;
        let records = self.lifecycle().unit_states().await?;
        Ok(group_by_machine(machines, &records))
    }

    /// Roll up process state by unit name, showing instance distribution
    /// across the cluster.
    pub async fn ps(&self) -> Result<Vec<UnitProcesses>, ReconcileError> {
        let records = self.lifecycle().unit_states().await?;
        Ok(group_by_unit(&records))
    }
}

#[cfg(test)]
mod tests {
    use fleetsvc_api::SystemdActiveState;

    use super::*;

    fn record(name: &str, machine_id: &str, sub_state: &str) -> UnitStateRecord {
        UnitStateRecord {
            name: name.to_string(),
            hash: None,
            machine_id: machine_id.to_string(),
            systemd_load_state: "loaded".to_string(),
            systemd_active_state: SystemdActiveState::Active,
            systemd_sub_state: sub_state.to_string(),
        }
    }

    fn machine(id: &str) -> Machine {
        Machine {
            id: id.to_string(),
            primary_ip: format!("10.0.0.{}", id.len()),
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_group_by_service_recovers_names() {
        let records = vec![
            record("web@1.service", "m-1", "running"),
            record("web@2.service", "m-2", "running"),
            record("api@1.service", "m-1", "running"),
            // No service attribution for these two.
            record("web@.service", "m-1", "dead"),
            record("standalone.service", "m-2", "running"),
        ];

        let services = group_by_service(&records);
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].service, "api");
        assert_eq!(services[1].service, "web");
        assert_eq!(services[1].units.len(), 2);
    }

    #[test]
    fn test_group_by_unit_collects_all_machines() {
        let records = vec![
            record("web@1.service", "m-1", "running"),
            record("web@1.service", "m-2", "auto-restart"),
        ];

        let units = group_by_unit(&records);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].unit, "web@1.service");
        assert_eq!(units[0].processes.len(), 2);
        assert_eq!(units[0].processes[1].sub_state, "auto-restart");
    }

    #[test]
    fn test_group_by_machine_empty_machine_has_no_units() {
        let machines = vec![machine("m-1"), machine("m-2")];
        let records = vec![record("web@1.service", "m-1", "running")];

        let rollup = group_by_machine(machines, &records);
        assert_eq!(rollup.len(), 2);
        assert_eq!(rollup[0].units.len(), 1);
        assert!(rollup[1].units.is_empty());
    }
}

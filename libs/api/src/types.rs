//! Wire types for the fleet v1 API.
//!
//! Field names follow the scheduler's camelCase JSON. Unit absence is never
//! a wire variant: a unit that does not exist simply does not appear in
//! list results, and callers model absence as `Option` at the observation
//! layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Target state requested of the scheduler for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DesiredState {
    /// Definition is stored but not scheduled anywhere.
    Inactive,
    /// Definition is scheduled to a machine but not started.
    Loaded,
    /// Definition is scheduled and started.
    Launched,
}

impl std::fmt::Display for DesiredState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesiredState::Inactive => write!(f, "inactive"),
            DesiredState::Loaded => write!(f, "loaded"),
            DesiredState::Launched => write!(f, "launched"),
        }
    }
}

/// Scheduler-observed state of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurrentState {
    Inactive,
    Loaded,
    Launched,
}

impl std::fmt::Display for CurrentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurrentState::Inactive => write!(f, "inactive"),
            CurrentState::Loaded => write!(f, "loaded"),
            CurrentState::Launched => write!(f, "launched"),
        }
    }
}

/// Process-manager active state, observed per machine on a separate
/// reporting path from [`CurrentState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SystemdActiveState {
    Active,
    Reloading,
    Inactive,
    Failed,
    Activating,
    Deactivating,
    /// States this client does not recognize; reported verbatim by newer
    /// process managers.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for SystemdActiveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SystemdActiveState::Active => "active",
            SystemdActiveState::Reloading => "reloading",
            SystemdActiveState::Inactive => "inactive",
            SystemdActiveState::Failed => "failed",
            SystemdActiveState::Activating => "activating",
            SystemdActiveState::Deactivating => "deactivating",
            SystemdActiveState::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// One `Key=Value` entry of a unit file, as submitted to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOption {
    pub section: String,
    pub name: String,
    pub value: String,
}

/// A unit as reported by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,

    pub desired_state: DesiredState,

    pub current_state: CurrentState,

    /// Machine the unit is scheduled to, if any.
    #[serde(rename = "machineID", default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
}

/// Per-machine process-manager state for a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStateRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(rename = "machineID")]
    pub machine_id: String,

    pub systemd_load_state: String,

    pub systemd_active_state: SystemdActiveState,

    pub systemd_sub_state: String,
}

/// A cluster node as reported by the machine inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,

    #[serde(rename = "primaryIP")]
    pub primary_ip: String,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

//! Wire types and HTTP client for the fleet unit-submission API.
//!
//! This library covers the scheduler's interface boundary and nothing
//! above it:
//!
//! - **Wire types**: units, unit states, machines, and the state enums
//!   the scheduler reports.
//! - **Unit files**: parsing opaque systemd unit text into the option
//!   triplets the submission API expects.
//! - **Client**: the [`SchedulerApi`] trait plus an HTTP implementation
//!   against the scheduler's v1 REST surface.
//!
//! Everything here is a thin, faithful mapping of the remote API. Policy
//! (waiting, ordering, ownership) lives in `fleetsvc-reconcile`.

mod client;
mod error;
mod types;
mod unit_file;

pub use client::{HttpSchedulerClient, SchedulerApi};
pub use error::ApiError;
pub use types::{
    CurrentState, DesiredState, Machine, SystemdActiveState, Unit, UnitOption, UnitStateRecord,
};
pub use unit_file::UnitDefinition;

//! Unit naming convention.
//!
//! A service is a pure naming convention over scheduler units, not a
//! remote entity:
//!
//! - template unit: `<service>@.service`, never launched
//! - instance unit: `<service>@<N>.service`, `N` a positive integer
//!   assigned contiguously from 1
//! - legacy non-templated unit: `<service>.service`
//!
//! Ownership is decided by name shape alone. A unit is *owned* by a
//! service iff its name is the canonical form `<service>@<N>.service`
//! with no leading zeros; any other `<service>@<suffix>.service` form is
//! foreign and gets destroyed during convergence. This is a known weak
//! invariant: there is no provenance tag distinguishing a foreign numeric
//! instance from one this engine created, so the name shape is the sole
//! authority.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ReconcileError;

/// Matches any instance unit and captures its service name.
fn instance_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9:_.@-]+)@\d+\.service$").expect("static regex must compile")
    })
}

/// The template unit name for a service.
pub fn template_unit_name(service: &str) -> String {
    format!("{}@.service", service)
}

/// The canonical instance unit name for instance `n` of a service.
pub fn instance_unit_name(service: &str, n: u32) -> String {
    format!("{}@{}.service", service, n)
}

/// The legacy, non-templated unit name for a service. Mutually exclusive
/// with the templated model; destroyed on sight during convergence.
pub fn legacy_unit_name(service: &str) -> String {
    format!("{}.service", service)
}

/// Recover the owning service name from an instance unit name.
///
/// Only concrete numbered instances match; the template (`web@.service`)
/// and non-instance units (`web.service`) do not.
pub fn service_of_instance(unit_name: &str) -> Option<&str> {
    instance_name_regex()
        .captures(unit_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Whether `unit_name` is any instance form of `service`, owned or not.
///
/// The suffix may be arbitrary (`web@canary.service`, `web@03.service`);
/// such units match the service's instance pattern without being part of
/// the numbering scheme.
pub fn is_instance_of(service: &str, unit_name: &str) -> bool {
    let Some(rest) = unit_name.strip_prefix(service) else {
        return false;
    };
    let Some(suffix) = rest.strip_prefix('@').and_then(|s| s.strip_suffix(".service")) else {
        return false;
    };
    !suffix.is_empty()
        && suffix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-'))
}

/// The instance number of `unit_name`, if it is an instance of `service`
/// owned by the numbering scheme.
///
/// Returns `None` for foreign forms: non-numeric suffixes, zero, and
/// non-canonical spellings like leading zeros (`web@03.service` would
/// collide with `web@3.service` under numeric aliasing, so it is treated
/// as foreign rather than owned).
pub fn instance_index(service: &str, unit_name: &str) -> Option<u32> {
    let rest = unit_name.strip_prefix(service)?;
    let digits = rest.strip_prefix('@')?.strip_suffix(".service")?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let n: u32 = digits.parse().ok()?;
    if n == 0 || instance_unit_name(service, n) != unit_name {
        return None;
    }

    Some(n)
}

/// Validate a service name for use in the naming convention.
///
/// The instance separator `@` is reserved; a service name containing it
/// would make instance names ambiguous.
pub fn validate_service_name(service: &str) -> Result<(), ReconcileError> {
    if service.is_empty() {
        return Err(ReconcileError::InvalidServiceName {
            name: service.to_string(),
            reason: "name is empty",
        });
    }

    if service.contains('@') {
        return Err(ReconcileError::InvalidServiceName {
            name: service.to_string(),
            reason: "name contains the instance separator '@'",
        });
    }

    if !service
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-'))
    {
        return Err(ReconcileError::InvalidServiceName {
            name: service.to_string(),
            reason: "name contains characters outside [A-Za-z0-9:_.-]",
        });
    }

    Ok(())
}

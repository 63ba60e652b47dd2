//! Error display for the CLI.

use colored::Colorize;

use fleetsvc_reconcile::ReconcileError;

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    // Provide hints for the common operational failures
    if let Some(reconcile_err) = err.downcast_ref::<ReconcileError>() {
        match reconcile_err {
            ReconcileError::Timeout { unit, .. } => {
                eprintln!(
                    "\n{}",
                    format!(
                        "Hint: {} may still be converging; inspect it with `fleetctl ps` and re-run. \
                         Already-applied changes are not rolled back.",
                        unit
                    )
                    .yellow()
                );
            }
            ReconcileError::NoInstances(service) => {
                eprintln!(
                    "\n{}",
                    format!(
                        "Hint: no units exist for '{}'; nothing was destroyed.",
                        service
                    )
                    .yellow()
                );
            }
            ReconcileError::Api(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: check the scheduler endpoint (--endpoint or FLEETCTL_ENDPOINT).".yellow()
                );
            }
            _ => {}
        }
    }
}

//! Destroy command (decommission a service).

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Destroy command - remove a service and every unit attributable to it.
#[derive(Debug, Args)]
pub struct DestroyCommand {
    /// Service name.
    service: String,
}

#[derive(Debug, Serialize)]
struct DestroySummary {
    service: String,
    destroyed_instances: Vec<u32>,
    foreign_removed: Vec<String>,
    legacy_removed: Option<String>,
}

impl DestroyCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let reconciler = ctx.reconciler()?;
        let plan = reconciler.decommission(&self.service).await?;

        let summary = DestroySummary {
            service: plan.service,
            destroyed_instances: plan.to_destroy,
            foreign_removed: plan.foreign,
            legacy_removed: plan.legacy,
        };

        match ctx.format {
            OutputFormat::Json => print_single(&summary),
            OutputFormat::Table => {
                print_success(&format!(
                    "Destroyed {} ({} instances removed)",
                    summary.service,
                    summary.destroyed_instances.len()
                ));
            }
        }

        Ok(())
    }
}

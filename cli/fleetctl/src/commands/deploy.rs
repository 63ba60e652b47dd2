//! Deploy command (converge a service).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::output::{print_single, print_success, OutputFormat};

use super::CommandContext;

/// Deploy command - converge a service to a desired instance count.
#[derive(Debug, Args)]
pub struct DeployCommand {
    /// Service name (instance units become NAME@N.service).
    service: String,

    /// Path to the systemd unit template file.
    #[arg(long)]
    unit_file: PathBuf,

    /// Desired instance count. 0 leaves only the template.
    #[arg(long, default_value_t = 3)]
    count: u32,
}

#[derive(Debug, Serialize)]
struct DeploySummary {
    service: String,
    created: Vec<u32>,
    updated: Vec<u32>,
    destroyed: Vec<u32>,
    foreign_removed: Vec<String>,
    legacy_removed: Option<String>,
}

impl DeployCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let unit_file = std::fs::read_to_string(&self.unit_file)
            .with_context(|| format!("Failed to read unit file {:?}", self.unit_file))?;

        let reconciler = ctx.reconciler()?;
        let plan = reconciler
            .converge(&self.service, &unit_file, self.count)
            .await?;

        let summary = DeploySummary {
            service: plan.service,
            created: plan.to_create,
            updated: plan.to_update,
            destroyed: plan.to_destroy,
            foreign_removed: plan.foreign,
            legacy_removed: plan.legacy,
        };

        match ctx.format {
            OutputFormat::Json => print_single(&summary),
            OutputFormat::Table => {
                print_success(&format!(
                    "Converged {} to {} instances ({} created, {} updated, {} destroyed)",
                    summary.service,
                    self.count,
                    summary.created.len(),
                    summary.updated.len(),
                    summary.destroyed.len(),
                ));
            }
        }

        Ok(())
    }
}

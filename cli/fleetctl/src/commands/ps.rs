//! Ps command (per-unit process state).

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, OutputFormat};

use super::CommandContext;

/// Ps command - show where each unit runs and its process state.
#[derive(Debug, Args)]
pub struct PsCommand {}

#[derive(Debug, Serialize, Tabled)]
struct PsRow {
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Machine")]
    machine: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Sub")]
    sub: String,
}

impl PsCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let reconciler = ctx.reconciler()?;
        let units = reconciler.ps().await?;

        let rows: Vec<PsRow> = units
            .iter()
            .flat_map(|unit| {
                unit.processes.iter().map(|process| PsRow {
                    unit: unit.unit.clone(),
                    machine: process.machine_id.clone(),
                    active: process.active_state.clone(),
                    sub: process.sub_state.clone(),
                })
            })
            .collect();

        print_output(&rows, ctx.format);
        Ok(())
    }
}

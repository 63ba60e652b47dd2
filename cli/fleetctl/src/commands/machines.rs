//! Machines command (cluster nodes with hosted units).

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, OutputFormat};

use super::CommandContext;

/// Machines command - list cluster nodes and the units they host.
#[derive(Debug, Args)]
pub struct MachinesCommand {}

#[derive(Debug, Serialize, Tabled)]
struct MachineRow {
    #[tabled(rename = "Machine")]
    machine: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Units")]
    units: usize,
    #[tabled(rename = "Hosted")]
    hosted: String,
}

impl MachinesCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let reconciler = ctx.reconciler()?;
        let machines = reconciler.list_machines().await?;

        let rows: Vec<MachineRow> = machines
            .iter()
            .map(|entry| {
                let hosted: Vec<&str> = entry
                    .units
                    .iter()
                    .map(|unit| unit.unit.as_str())
                    .collect();
                MachineRow {
                    machine: entry.machine.id.clone(),
                    ip: entry.machine.primary_ip.clone(),
                    units: entry.units.len(),
                    hosted: if hosted.is_empty() {
                        "-".to_string()
                    } else {
                        hosted.join(", ")
                    },
                }
            })
            .collect();

        print_output(&rows, ctx.format);
        Ok(())
    }
}

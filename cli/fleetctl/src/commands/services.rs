//! Services command (process state grouped by service).

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_output, OutputFormat};

use super::CommandContext;

/// Services command - list services with their instance process state.
#[derive(Debug, Args)]
pub struct ServicesCommand {}

#[derive(Debug, Serialize, Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Machine")]
    machine: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Sub")]
    sub: String,
}

impl ServicesCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let reconciler = ctx.reconciler()?;
        let services = reconciler.list_services().await?;

        let rows: Vec<ServiceRow> = services
            .iter()
            .flat_map(|service| {
                service.units.iter().flat_map(|unit| {
                    unit.processes.iter().map(|process| ServiceRow {
                        service: service.service.clone(),
                        unit: unit.unit.clone(),
                        machine: process.machine_id.clone(),
                        active: process.active_state.clone(),
                        sub: process.sub_state.clone(),
                    })
                })
            })
            .collect();

        print_output(&rows, ctx.format);
        Ok(())
    }
}

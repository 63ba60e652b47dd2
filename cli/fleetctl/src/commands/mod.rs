//! CLI commands.

mod deploy;
mod destroy;
mod machines;
mod ps;
mod services;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fleetsvc_api::HttpSchedulerClient;
use fleetsvc_reconcile::{LifecycleClient, ServiceReconciler, WaitConfig};

use crate::config::Config;
use crate::output::OutputFormat;

/// fleetctl - deploy and manage templated services on a fleet cluster.
#[derive(Debug, Parser)]
#[command(name = "fleetctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Scheduler API endpoint URL.
    #[arg(long, global = true, env = "FLEETCTL_ENDPOINT")]
    endpoint: Option<String>,

    /// Total budget in seconds for each convergence wait.
    #[arg(long, global = true, default_value_t = 600)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Converge a service to a desired instance count.
    Deploy(deploy::DeployCommand),

    /// Destroy a service and all of its units.
    Destroy(destroy::DestroyCommand),

    /// List services and their process state.
    Services(services::ServicesCommand),

    /// List machines and the units they host.
    Machines(machines::MachinesCommand),

    /// Show per-unit process state across the cluster.
    Ps(ps::PsCommand),
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let format = match self.format.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        };

        let config = Config::load()?;
        let ctx = CommandContext {
            endpoint: self.endpoint.unwrap_or_else(|| config.endpoint.clone()),
            timeout: Duration::from_secs(self.timeout_secs),
            format,
        };

        match self.command {
            Commands::Deploy(cmd) => cmd.run(ctx).await,
            Commands::Destroy(cmd) => cmd.run(ctx).await,
            Commands::Services(cmd) => cmd.run(ctx).await,
            Commands::Machines(cmd) => cmd.run(ctx).await,
            Commands::Ps(cmd) => cmd.run(ctx).await,
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub endpoint: String,
    pub timeout: Duration,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Build a reconciler over the configured scheduler endpoint.
    pub fn reconciler(&self) -> Result<ServiceReconciler<HttpSchedulerClient>> {
        let api = HttpSchedulerClient::new(&self.endpoint)?;
        let wait = WaitConfig {
            timeout: self.timeout,
            ..WaitConfig::default()
        };
        Ok(ServiceReconciler::new(LifecycleClient::with_wait_config(
            api, wait,
        )))
    }
}

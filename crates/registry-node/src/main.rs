//! `registry-node` binary entry point.

use anyhow::{Context, Result};
use clap::Parser;
use proof_registry::{RegistryError, RegistryErrorPayload};
use registry_node::cli::{execute, Cli, Output};
use registry_node::{NodeConfig, RegistryNode};
use registry_telemetry::{init_tracing, register_metrics, TelemetryConfig};
use std::process::ExitCode;
use tracing::{debug, info};

fn run(cli: Cli) -> Result<Output> {
    let mut config = NodeConfig::from_env().context("Invalid environment configuration")?;
    cli.apply(&mut config);

    register_metrics().context("Failed to register metrics")?;

    let mut node = RegistryNode::open(&config)?;
    let result = execute(&node, cli.command);
    let flushed = node.flush_events();
    debug!(events = flushed, "[node] Flushed events");
    result
}

fn report(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<RegistryError>() {
        Some(registry_err) => serde_json::to_value(RegistryErrorPayload::from(registry_err)),
        None => Ok(serde_json::json!({ "class": "node", "message": format!("{:#}", err) })),
    };
    match payload.and_then(|p| serde_json::to_string_pretty(&serde_json::json!({ "error": p }))) {
        Ok(text) => eprintln!("{}", text),
        Err(_) => eprintln!("error: {:#}", err),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig::from_env();
    if let Err(e) = init_tracing(&telemetry) {
        eprintln!("warning: {}", e);
    }
    info!(service = %telemetry.service_name, "Starting registry node");

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

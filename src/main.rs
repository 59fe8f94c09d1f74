mod app_system;
mod cli;
mod config;
mod dashboard;
mod domain;
mod error;
mod form;
mod render;
mod shell;
mod store;

#[cfg(test)]
mod mock_framework;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, Backend, InventorySystem};
use crate::cli::{Args, Command};
use crate::config::DashboardConfig;
use crate::dashboard::DashboardClient;
use crate::render::{render, RenderOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let config = DashboardConfig::load(&args.overrides()).context("loading configuration")?;
    let backend = if args.demo {
        Backend::Demo
    } else {
        Backend::Remote
    };
    let system = InventorySystem::start(&config, backend).context("starting record service client")?;

    let command = args.command.clone().unwrap_or(Command::List);
    let span = tracing::info_span!("command", ?command);
    let outcome = run(&system.dashboard, &config, command)
        .instrument(span)
        .await;

    if let Err(e) = &outcome {
        error!(error = %e, "Command failed");
    }
    system.shutdown().await?;
    outcome
}

async fn run(
    dashboard: &DashboardClient,
    config: &DashboardConfig,
    command: Command,
) -> anyhow::Result<()> {
    // Mount: the inventory is fetched exactly once per invocation.
    let mounted = dashboard.load().await;

    if let Command::Shell = command {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        return shell::run_shell(
            dashboard,
            stdin,
            &mut stdout,
            config.default_low_stock_threshold,
        )
        .await;
    }

    let mut stdout = std::io::stdout();
    if let Err(e) = mounted {
        write!(stdout, "{}", render(&dashboard.snapshot().await?, RenderOptions::default()))?;
        return Err(e.into());
    }

    let mut options = RenderOptions::default();
    let action = match command {
        Command::List | Command::Shell => Ok(()),
        Command::LowStock => {
            options.low_stock_only = true;
            Ok(())
        }
        Command::Add(add) => {
            let payload = add.form().validate(config.default_low_stock_threshold)?;
            match dashboard.add(payload).await {
                Ok(product) => {
                    info!(product_id = %product.id, "Added product");
                    writeln!(stdout, "Added {} ({})\n", product.name, product.id)?;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::Edit(edit) => {
            let patch = edit.form().validate()?;
            match dashboard.edit(edit.id, patch).await {
                Ok(product) => {
                    writeln!(stdout, "Updated {} ({})\n", product.name, product.id)?;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::Delete { id } => match dashboard.delete(id.clone()).await {
            Ok(()) => {
                writeln!(stdout, "Deleted {id}\n")?;
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    // A failed mutation still renders; the status line carries the error.
    write!(stdout, "{}", render(&dashboard.snapshot().await?, options))?;
    action.map_err(Into::into)
}

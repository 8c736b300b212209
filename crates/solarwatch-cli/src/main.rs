// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of SolarWatch.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! CLI entry point for SolarWatch

mod args;
mod formatters;

use anyhow::{Context, Result};
use args::{Cli, Commands, EnergyArgs, PowerArgs, ReportArgs};
use clap::Parser;
use formatters::TableFormatter;
use serde::Serialize;
use solarwatch_api::{
    ApiConfig, SolarDataProvider, Sourced, compare_installations, dashboard_summary,
};
use solarwatch_types::PdfReport;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays machine readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("solarwatch=info,solarwatch_api=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let provider = SolarDataProvider::from_config(&config)
        .context("Failed to initialise the data provider")?;

    run(&provider, cli.command, cli.json).await
}

fn load_config(path: Option<&Path>) -> Result<ApiConfig> {
    let Some(path) = path else {
        return Ok(ApiConfig::load()?);
    };

    let mut config = ApiConfig::load_from_path(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Print a sourced value as JSON or as a table with a source note
fn emit<T: Serialize>(
    sourced: &Sourced<T>,
    json: bool,
    table: impl FnOnce(&T) -> String,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(sourced.get())?);
    } else {
        println!("{}", table(sourced.get()));
        println!("{}", TableFormatter::source_note(sourced.source_label()));
    }
    Ok(())
}

async fn run(provider: &SolarDataProvider, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Clients => {
            let clients = provider.list_clients().await?;
            emit(&clients, json, |c| TableFormatter::format_clients(c))
        }
        Commands::Installations { client } => {
            let installations = provider.list_installations(client.as_deref()).await?;
            emit(&installations, json, |i| {
                TableFormatter::format_installations(i)
            })
        }
        Commands::Power(PowerArgs {
            installation_id,
            granularity,
            range,
        }) => {
            let series = provider
                .power_series(&installation_id, granularity, range.to_range())
                .await?;
            emit(&series, json, |s| TableFormatter::format_power(s))
        }
        Commands::Energy(EnergyArgs {
            installation_id,
            granularity,
            range,
        }) => {
            let series = provider
                .energy_series(&installation_id, granularity, range.to_range())
                .await?;
            emit(&series, json, |s| TableFormatter::format_energy(s))
        }
        Commands::Weather {
            installation_id,
            range,
        } => {
            let series = provider
                .weather_series(&installation_id, range.to_range())
                .await?;
            emit(&series, json, |s| TableFormatter::format_weather(s))
        }
        Commands::Detail { installation_id } => {
            let detail = provider
                .installation_detail(&installation_id)
                .await
                .with_context(|| format!("Cannot show installation {installation_id}"))?;
            emit(&detail, json, |d| TableFormatter::format_detail(d))
        }
        Commands::Issues { installation } => {
            let issues = provider.list_issues(installation.as_deref()).await?;
            emit(&issues, json, |i| TableFormatter::format_issues(i))
        }
        Commands::Report(args) => report_command(provider, args, json).await,
        Commands::Compare { client, period } => {
            let fleet = compare_installations(provider, client.as_deref(), period).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&fleet.comparisons)?);
            } else {
                println!("{}", TableFormatter::format_comparison(&fleet));
                let label = if fleet.used_fallback { "fallback" } else { "remote" };
                println!("{}", TableFormatter::source_note(label));
            }
            Ok(())
        }
        Commands::Status => {
            let backend = provider.remote();
            let reachable = backend.ping().await;
            if json {
                let status = serde_json::json!({
                    "backend": backend.base_url(),
                    "reachable": reachable,
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("{}", TableFormatter::format_status(backend.base_url(), reachable));
            }
            Ok(())
        }
        Commands::Summary => {
            let (summary, used_fallback) = dashboard_summary(provider).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", TableFormatter::format_summary(&summary));
                let label = if used_fallback { "fallback" } else { "remote" };
                println!("{}", TableFormatter::source_note(label));
            }
            Ok(())
        }
    }
}

async fn report_command(provider: &SolarDataProvider, args: ReportArgs, json: bool) -> Result<()> {
    let ReportArgs {
        installation_id,
        month,
        year,
        pdf,
    } = args;

    let report = provider
        .monthly_report(&installation_id, month, year)
        .await
        .with_context(|| format!("Cannot build report for installation {installation_id}"))?;
    emit(&report, json, |r| TableFormatter::format_report(r))?;

    if let Some(target) = pdf {
        let document = provider
            .generate_pdf_report(&installation_id, month, year)
            .await?;

        let path = if target.is_dir() {
            target.join(PdfReport::file_name(&installation_id, month, year))
        } else {
            target
        };
        std::fs::write(&path, &document.get().bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(
            "📄 Saved {} byte PDF ({}) to {}",
            document.get().len(),
            document.source_label(),
            path.display()
        );
    }

    Ok(())
}

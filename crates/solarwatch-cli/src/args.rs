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

//! CLI argument definitions using clap.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use solarwatch_types::{ComparisonPeriod, DateRange, EnergyGranularity, PowerGranularity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solarwatch")]
#[command(author, version, about = "SolarWatch monitoring CLI")]
#[command(
    long_about = "Query installations, time series, issues and reports from the SolarWatch\n\
    monitoring backend. When the backend is unreachable, locally generated data is shown\n\
    instead and marked as fallback.\n\
    \nExamples:\n  \
    solarwatch installations --client client-001\n  \
    solarwatch power inst-001 --granularity hourly\n  \
    solarwatch report inst-001 --month 6 --year 2024 --pdf june.pdf\n  \
    solarwatch compare --period yearly --json"
)]
pub struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true, env = "SOLARWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List clients and their installations
    Clients,

    /// List installations, optionally for one client
    Installations {
        #[arg(long)]
        client: Option<String>,
    },

    /// Power time series of an installation
    Power(PowerArgs),

    /// Energy flows (production, consumption, export, import)
    Energy(EnergyArgs),

    /// Weather readings at an installation
    Weather {
        installation_id: String,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Current state and recent history of one installation
    Detail { installation_id: String },

    /// Process issues, optionally for one installation
    Issues {
        #[arg(long)]
        installation: Option<String>,
    },

    /// Monthly report, optionally saved as PDF
    #[command(
        long_about = "Show the monthly report of an installation.\n\
        \nWith --pdf the report document is generated and written to the given path.\n\
        \nExamples:\n  \
        solarwatch report inst-001 --month 6 --year 2024\n  \
        solarwatch report inst-001 --month 6 --year 2024 --pdf report.pdf"
    )]
    Report(ReportArgs),

    /// Compare production across installations
    Compare {
        #[arg(long)]
        client: Option<String>,

        /// Comparison period (daily, monthly, yearly)
        #[arg(long, default_value = "monthly")]
        period: ComparisonPeriod,
    },

    /// Headline figures for the whole fleet
    Summary,

    /// Check whether the monitoring backend is reachable
    Status,
}

#[derive(Args)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

impl RangeArgs {
    pub fn to_range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

#[derive(Args)]
pub struct PowerArgs {
    pub installation_id: String,

    /// Bucket width (5min, hourly, daily, monthly, yearly)
    #[arg(long, default_value = "5min")]
    pub granularity: PowerGranularity,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args)]
pub struct EnergyArgs {
    pub installation_id: String,

    /// Bucket width (hourly, daily, monthly, yearly)
    #[arg(long, default_value = "hourly")]
    pub granularity: EnergyGranularity,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Args)]
pub struct ReportArgs {
    pub installation_id: String,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: u32,

    #[arg(long)]
    pub year: i32,

    /// Write the PDF document to this path
    #[arg(long)]
    pub pdf: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_power_arguments() {
        let cli = Cli::try_parse_from([
            "solarwatch",
            "power",
            "inst-001",
            "--granularity",
            "daily",
            "--start",
            "2024-06-01",
        ])
        .unwrap();

        match cli.command {
            Commands::Power(args) => {
                assert_eq!(args.installation_id, "inst-001");
                assert_eq!(args.granularity, PowerGranularity::Daily);
                let range = args.range.to_range();
                assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 6, 1));
                assert_eq!(range.end, None);
            }
            _ => panic!("expected power command"),
        }
    }

    #[test]
    fn test_report_month_is_bounded() {
        let result = Cli::try_parse_from([
            "solarwatch", "report", "inst-001", "--month", "13", "--year", "2024",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_command() {
        let cli = Cli::try_parse_from(["solarwatch", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_global_json_flag() {
        let cli = Cli::try_parse_from(["solarwatch", "summary", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Summary));
    }
}

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

//! Derived metrics computed client-side over fetched collections

use crate::installation::{Client, Installation, InstallationStatus};
use crate::issues::ProcessIssue;
use crate::series::{EnergyData, EnergyFlow, EnergyGranularity};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison window offered by the installation comparison view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonPeriod {
    Daily,
    #[default]
    Monthly,
    Yearly,
}

impl ComparisonPeriod {
    /// Energy granularity fetched for this period.
    /// A daily comparison sums hourly buckets.
    pub fn granularity(&self) -> EnergyGranularity {
        match self {
            Self::Daily => EnergyGranularity::Hourly,
            Self::Monthly => EnergyGranularity::Monthly,
            Self::Yearly => EnergyGranularity::Yearly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for ComparisonPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(anyhow::anyhow!(
                "Unknown comparison period: '{s}'. Supported: daily, monthly, yearly"
            )),
        }
    }
}

/// Production of one installation over a comparison period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationComparison {
    pub installation_id: String,
    pub installation_name: String,
    /// Installed power (kW)
    pub total_power: f64,
    /// Produced energy (kWh)
    pub total_energy: f64,
    /// Specific yield (kWh/kW)
    pub energy_yield: f64,
    pub period: ComparisonPeriod,
}

impl InstallationComparison {
    /// Sum production points and normalise by installed power
    pub fn from_energy_series(
        installation: &Installation,
        period: ComparisonPeriod,
        series: &[EnergyData],
    ) -> Self {
        let total_energy: f64 = series
            .iter()
            .filter(|d| d.flow == EnergyFlow::Production)
            .map(|d| d.energy)
            .sum();

        let energy_yield = if installation.installed_power > 0.0 {
            total_energy / installation.installed_power
        } else {
            0.0
        };

        Self {
            installation_id: installation.id.clone(),
            installation_name: installation.name.clone(),
            total_power: installation.installed_power,
            total_energy,
            energy_yield,
            period,
        }
    }
}

/// Fleet totals shown above the comparison chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonOverview {
    pub total_installed_power: f64,
    pub total_energy: f64,
    pub average_yield: f64,
}

impl ComparisonOverview {
    pub fn from_comparisons(
        installations: &[Installation],
        comparisons: &[InstallationComparison],
    ) -> Self {
        let total_installed_power = installations.iter().map(|i| i.installed_power).sum();
        let total_energy = comparisons.iter().map(|c| c.total_energy).sum();
        let average_yield = if comparisons.is_empty() {
            0.0
        } else {
            comparisons.iter().map(|c| c.energy_yield).sum::<f64>() / comparisons.len() as f64
        };

        Self {
            total_installed_power,
            total_energy,
            average_yield,
        }
    }
}

/// Headline figures of the dashboard landing page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_installations: usize,
    pub active_installations: usize,
    /// kW
    pub total_installed_power: f64,
    pub total_clients: usize,
    pub open_issues: usize,
    pub critical_issues: usize,
}

impl DashboardSummary {
    pub fn from_parts(
        installations: &[Installation],
        clients: &[Client],
        issues: &[ProcessIssue],
    ) -> Self {
        Self {
            total_installations: installations.len(),
            active_installations: installations
                .iter()
                .filter(|i| i.status == InstallationStatus::Active)
                .count(),
            total_installed_power: installations.iter().map(|i| i.installed_power).sum(),
            total_clients: clients.len(),
            open_issues: issues.iter().filter(|i| i.is_open()).count(),
            critical_issues: issues.iter().filter(|i| i.is_critical()).count(),
        }
    }
}

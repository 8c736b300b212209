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

//! Time series points and the granularities they are requested at

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Factor between m/s and km/h
const MS_TO_KMH: f64 = 3.6;

/// One power sample. Consumers expect ascending timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerData {
    pub timestamp: DateTime<Utc>,
    /// Output power (kW)
    pub power: f64,
    /// Plane-of-array irradiation (W/m²)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irradiation: Option<f64>,
}

/// Direction of an energy flow at the installation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyFlow {
    Production,
    Consumption,
    Export,
    Import,
}

impl EnergyFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Consumption => "consumption",
            Self::Export => "export",
            Self::Import => "import",
        }
    }

    /// All flows in the order a synthesized timestamp emits them
    pub fn all() -> &'static [EnergyFlow] {
        &[
            Self::Production,
            Self::Consumption,
            Self::Export,
            Self::Import,
        ]
    }
}

impl fmt::Display for EnergyFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One energy value for a single (timestamp, flow) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyData {
    pub timestamp: DateTime<Utc>,
    /// Energy (kWh)
    pub energy: f64,
    #[serde(rename = "type")]
    pub flow: EnergyFlow,
}

/// Weather reading at the installation site.
///
/// Wind speed is carried in m/s. Presentation layers that show km/h convert
/// with [`WeatherData::wind_speed_kmh`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    pub timestamp: DateTime<Utc>,
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Global horizontal irradiation (W/m²)
    pub irradiation: f64,
}

impl WeatherData {
    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed * MS_TO_KMH
    }
}

/// Bucket width of a power series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerGranularity {
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "hourly")]
    Hourly,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "yearly")]
    Yearly,
}

impl PowerGranularity {
    /// Query string value understood by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiveMinutes => "5min",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn all() -> &'static [PowerGranularity] {
        &[
            Self::FiveMinutes,
            Self::Hourly,
            Self::Daily,
            Self::Monthly,
            Self::Yearly,
        ]
    }

    /// Buckets shorter than a day, where the time of day is meaningful
    pub fn is_intraday(&self) -> bool {
        matches!(self, Self::FiveMinutes | Self::Hourly)
    }
}

impl fmt::Display for PowerGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerGranularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|g| g.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown power granularity: '{}'. Supported: {}",
                    s,
                    Self::all()
                        .iter()
                        .map(PowerGranularity::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// Bucket width of an energy series (no 5-minute energy buckets exist)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyGranularity {
    Hourly,
    Daily,
    Monthly,
    Yearly,
}

impl EnergyGranularity {
    pub fn as_str(&self) -> &'static str {
        PowerGranularity::from(*self).as_str()
    }

    pub fn all() -> &'static [EnergyGranularity] {
        &[Self::Hourly, Self::Daily, Self::Monthly, Self::Yearly]
    }
}

impl From<EnergyGranularity> for PowerGranularity {
    fn from(value: EnergyGranularity) -> Self {
        match value {
            EnergyGranularity::Hourly => Self::Hourly,
            EnergyGranularity::Daily => Self::Daily,
            EnergyGranularity::Monthly => Self::Monthly,
            EnergyGranularity::Yearly => Self::Yearly,
        }
    }
}

impl fmt::Display for EnergyGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyGranularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|g| g.as_str() == s.to_lowercase())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown energy granularity: '{s}'. Supported: hourly, daily, monthly, yearly"
                )
            })
    }
}

/// Optional `start_date` / `end_date` filter of a series request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Query parameters for the set bounds, omitting absent ones
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

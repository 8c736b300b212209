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

use crate::series::{PowerData, WeatherData};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operational state of a PV installation as reported by the monitoring backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallationStatus {
    Active,
    Inactive,
    Maintenance,
    Error,
}

impl InstallationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Maintenance => "maintenance",
            Self::Error => "error",
        }
    }

    /// Whether the installation is expected to be producing right now
    pub fn is_producing(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "maintenance" => Ok(Self::Maintenance),
            "error" => Ok(Self::Error),
            _ => Err(anyhow::anyhow!("Unknown installation status: '{s}'")),
        }
    }
}

/// A monitored PV installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    pub id: String,
    pub name: String,
    /// Owning client (references `Client::id`)
    pub client_id: String,
    /// Owner name, denormalised by the backend for list views
    #[serde(default)]
    pub client_name: String,
    /// Nameplate power (kW)
    pub installed_power: f64,
    pub location: String,
    pub status: InstallationStatus,
    pub last_update: DateTime<Utc>,
}

/// A client owning zero or more installations.
///
/// `installations` is a view over `Installation::client_id`, never an
/// independent source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub installations: Vec<Installation>,
}

impl Client {
    /// Total nameplate power across the client's installations (kW)
    pub fn installed_power(&self) -> f64 {
        self.installations.iter().map(|i| i.installed_power).sum()
    }
}

/// Composite view used by the installation detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationDetail {
    pub installation: Installation,
    /// Instantaneous output (kW)
    pub current_power: f64,
    /// Energy produced and consumed on site (kWh)
    #[serde(rename = "autokonsumpcja", alias = "selfConsumption")]
    pub self_consumption: f64,
    /// Energy drawn from the grid (kWh)
    pub energy_imported: f64,
    /// Energy fed into the grid (kWh)
    pub energy_exported: f64,
    pub power_history: Vec<PowerData>,
    #[serde(default)]
    pub weather_data: Vec<WeatherData>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_installation_wire_format() {
        let value = json!({
            "id": "inst-001",
            "name": "Solar Farm Alpha",
            "clientId": "client-001",
            "clientName": "Green Energy Corp",
            "installedPower": 50.0,
            "location": "Warsaw, Poland",
            "status": "maintenance",
            "lastUpdate": "2024-06-01T10:00:00Z"
        });

        let installation: Installation = serde_json::from_value(value).unwrap();
        assert_eq!(installation.client_id, "client-001");
        assert_eq!(installation.status, InstallationStatus::Maintenance);

        let back = serde_json::to_value(&installation).unwrap();
        assert_eq!(back["installedPower"], 50.0);
        assert_eq!(back["status"], "maintenance");
    }

    #[test]
    fn test_client_name_is_optional_on_the_wire() {
        let value = json!({
            "id": "inst-009",
            "name": "Roof",
            "clientId": "client-009",
            "installedPower": 4.2,
            "location": "Brno",
            "status": "active",
            "lastUpdate": "2024-06-01T10:00:00Z"
        });

        let installation: Installation = serde_json::from_value(value).unwrap();
        assert!(installation.client_name.is_empty());
    }

    #[test]
    fn test_detail_accepts_legacy_self_consumption_name() {
        let value = json!({
            "installation": {
                "id": "inst-001",
                "name": "Solar Farm Alpha",
                "clientId": "client-001",
                "clientName": "Green Energy Corp",
                "installedPower": 50.0,
                "location": "Warsaw, Poland",
                "status": "active",
                "lastUpdate": "2024-06-01T10:00:00Z"
            },
            "currentPower": 31.2,
            "autokonsumpcja": 64.0,
            "energyImported": 12.5,
            "energyExported": 40.1,
            "powerHistory": []
        });

        let detail: InstallationDetail = serde_json::from_value(value).unwrap();
        assert_eq!(detail.self_consumption, 64.0);
        assert!(detail.weather_data.is_empty());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "Active".parse::<InstallationStatus>().unwrap(),
            InstallationStatus::Active
        );
        assert!("broken".parse::<InstallationStatus>().is_err());
        assert!(InstallationStatus::Active.is_producing());
        assert!(!InstallationStatus::Maintenance.is_producing());
    }
}

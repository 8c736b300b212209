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

//! Fixed seed catalog backing every fallback response

use crate::errors::{ApiError, ApiResult};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use solarwatch_types::{Client, Installation, InstallationStatus, IssueSeverity, ProcessIssue};
use std::collections::HashSet;
use std::path::Path;

/// Immutable set of installations, clients and issues.
///
/// Construction guarantees that every `client_id` and `installation_id` resolves
/// and that each client's `installations` list is exactly the installations
/// pointing at it.
#[derive(Debug, Clone)]
pub struct Catalog {
    installations: Vec<Installation>,
    clients: Vec<Client>,
    issues: Vec<ProcessIssue>,
}

/// On-disk catalog layout. Client installation lists are derived, not read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    installations: Vec<Installation>,
    clients: Vec<CatalogClient>,
    #[serde(default)]
    issues: Vec<ProcessIssue>,
}

#[derive(Debug, Deserialize)]
struct CatalogClient {
    id: String,
    name: String,
    email: String,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and dangling references
    pub fn new(
        installations: Vec<Installation>,
        clients: Vec<Client>,
        issues: Vec<ProcessIssue>,
    ) -> ApiResult<Self> {
        validate_references(&installations, &clients, &issues)?;
        Ok(Self::link(installations, clients, issues))
    }

    /// Rebuild each client's installation view from `Installation::client_id`
    fn link(
        installations: Vec<Installation>,
        clients: Vec<Client>,
        issues: Vec<ProcessIssue>,
    ) -> Self {
        let clients = clients
            .into_iter()
            .map(|client| {
                let owned = installations
                    .iter()
                    .filter(|i| i.client_id == client.id)
                    .cloned()
                    .collect();
                Client {
                    installations: owned,
                    ..client
                }
            })
            .collect();

        Self {
            installations,
            clients,
            issues,
        }
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file(path: &Path) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&content).map_err(|e| {
            ApiError::CatalogError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        let clients = file
            .clients
            .into_iter()
            .map(|c| Client {
                id: c.id,
                name: c.name,
                email: c.email,
                installations: Vec::new(),
            })
            .collect();

        Self::new(file.installations, clients, file.issues)
    }

    /// Three installations, two clients and three issues, timestamped relative to `now`
    pub fn demo(now: DateTime<Utc>) -> Self {
        let installation = |id: &str,
                            name: &str,
                            client_id: &str,
                            client_name: &str,
                            installed_power: f64,
                            location: &str,
                            status: InstallationStatus| Installation {
            id: id.to_string(),
            name: name.to_string(),
            client_id: client_id.to_string(),
            client_name: client_name.to_string(),
            installed_power,
            location: location.to_string(),
            status,
            last_update: now,
        };

        let installations = vec![
            installation(
                "inst-001",
                "Solar Farm Alpha",
                "client-001",
                "Green Energy Corp",
                50.0,
                "Warsaw, Poland",
                InstallationStatus::Active,
            ),
            installation(
                "inst-002",
                "Residential Solar 1",
                "client-002",
                "John Smith",
                10.5,
                "Krakow, Poland",
                InstallationStatus::Active,
            ),
            installation(
                "inst-003",
                "Industrial Solar",
                "client-001",
                "Green Energy Corp",
                100.0,
                "Gdansk, Poland",
                InstallationStatus::Maintenance,
            ),
        ];

        let client = |id: &str, name: &str, email: &str| Client {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            installations: Vec::new(),
        };

        let clients = vec![
            client("client-001", "Green Energy Corp", "contact@greenenergy.com"),
            client("client-002", "John Smith", "john.smith@email.com"),
        ];

        let issue = |id: &str,
                     installation_id: &str,
                     severity: IssueSeverity,
                     message: &str,
                     age: Duration,
                     resolved: bool| ProcessIssue {
            id: id.to_string(),
            installation_id: installation_id.to_string(),
            severity,
            message: message.to_string(),
            timestamp: now - age,
            resolved,
        };

        let issues = vec![
            issue(
                "issue-001",
                "inst-001",
                IssueSeverity::Warning,
                "Inverter efficiency below optimal range",
                Duration::hours(2),
                false,
            ),
            issue(
                "issue-002",
                "inst-002",
                IssueSeverity::Info,
                "Scheduled maintenance completed",
                Duration::hours(24),
                true,
            ),
            issue(
                "issue-003",
                "inst-003",
                IssueSeverity::Error,
                "Communication lost with monitoring system",
                Duration::minutes(30),
                false,
            ),
        ];

        Self::link(installations, clients, issues)
    }

    pub fn installations(&self) -> &[Installation] {
        &self.installations
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn issues(&self) -> &[ProcessIssue] {
        &self.issues
    }

    pub fn installation(&self, id: &str) -> Option<&Installation> {
        self.installations.iter().find(|i| i.id == id)
    }

    /// Installations of one client, or all of them
    pub fn installations_for(&self, client_id: Option<&str>) -> Vec<Installation> {
        self.installations
            .iter()
            .filter(|i| client_id.is_none_or(|c| i.client_id == c))
            .cloned()
            .collect()
    }

    /// Issues of one installation, or all of them
    pub fn issues_for(&self, installation_id: Option<&str>) -> Vec<ProcessIssue> {
        self.issues
            .iter()
            .filter(|i| installation_id.is_none_or(|id| i.installation_id == id))
            .cloned()
            .collect()
    }
}

fn validate_references(
    installations: &[Installation],
    clients: &[Client],
    issues: &[ProcessIssue],
) -> ApiResult<()> {
    let client_ids = unique_ids(clients.iter().map(|c| c.id.as_str()), "client")?;
    let installation_ids =
        unique_ids(installations.iter().map(|i| i.id.as_str()), "installation")?;
    unique_ids(issues.iter().map(|i| i.id.as_str()), "issue")?;

    if let Some(bad) = installations
        .iter()
        .find(|i| !i.installed_power.is_finite() || i.installed_power < 0.0)
    {
        return Err(ApiError::CatalogError(format!(
            "installation {} has invalid installed power {}",
            bad.id, bad.installed_power
        )));
    }

    if let Some(orphan) = installations
        .iter()
        .find(|i| !client_ids.contains(i.client_id.as_str()))
    {
        return Err(ApiError::CatalogError(format!(
            "installation {} references unknown client {}",
            orphan.id, orphan.client_id
        )));
    }

    if let Some(orphan) = issues
        .iter()
        .find(|i| !installation_ids.contains(i.installation_id.as_str()))
    {
        return Err(ApiError::CatalogError(format!(
            "issue {} references unknown installation {}",
            orphan.id, orphan.installation_id
        )));
    }

    Ok(())
}

fn unique_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    kind: &str,
) -> ApiResult<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ApiError::CatalogError(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(seen)
}

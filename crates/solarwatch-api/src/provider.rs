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

//! Resilient data provider: remote first, local generator on failure

use crate::config::ApiConfig;
use crate::errors::{ApiResult, validate_month};
use crate::generator::LocalGenerator;
use crate::remote::RemoteClient;
use crate::source::SolarDataSource;
use solarwatch_types::{
    Client, DateRange, EnergyData, EnergyGranularity, Installation, InstallationDetail,
    MonthlyReport, PdfReport, PowerData, PowerGranularity, ProcessIssue, WeatherData,
};
use std::future::Future;
use tracing::{debug, info, warn};

/// Which data path produced a value
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    /// Answered by the monitoring backend
    Remote(T),
    /// Generated locally after the backend call failed
    Fallback(T),
}

impl<T> Sourced<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Remote(value) | Self::Fallback(value) => value,
        }
    }

    pub fn get(&self) -> &T {
        match self {
            Self::Remote(value) | Self::Fallback(value) => value,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Transform the value, keeping the arm
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Sourced<U> {
        match self {
            Self::Remote(value) => Sourced::Remote(f(value)),
            Self::Fallback(value) => Sourced::Fallback(f(value)),
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Fallback(_) => "fallback",
        }
    }
}

/// One accessor per dashboard data need.
///
/// Each call makes a single attempt on the remote source. Recoverable failures
/// are logged and answered by the local source with the same arguments; a
/// `NotFound` or configuration error is returned as is.
#[derive(Debug, Clone)]
pub struct SolarDataProvider<R = RemoteClient, L = LocalGenerator> {
    remote: R,
    local: L,
}

impl SolarDataProvider {
    /// Build the HTTP client and the local generator from configuration
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        let remote = RemoteClient::new(config)?;
        let local = LocalGenerator::from_config(&config.fallback)?;
        info!(
            "🌞 Data provider ready: backend {}, fallback time zone {}",
            remote.base_url(),
            local.timezone()
        );
        Ok(Self::new(remote, local))
    }
}

impl<R, L> SolarDataProvider<R, L>
where
    R: SolarDataSource,
    L: SolarDataSource,
{
    pub fn new(remote: R, local: L) -> Self {
        Self { remote, local }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    async fn with_fallback<T, Fut>(
        &self,
        operation: &str,
        remote: ApiResult<T>,
        fallback: impl FnOnce() -> Fut,
    ) -> ApiResult<Sourced<T>>
    where
        Fut: Future<Output = ApiResult<T>>,
    {
        match remote {
            Ok(value) => {
                debug!("✅ [PROVIDER] {} answered by backend", operation);
                Ok(Sourced::Remote(value))
            }
            Err(e) if e.is_recoverable() => {
                warn!("⚠️ [PROVIDER] {} failed, using local data: {}", operation, e);
                fallback().await.map(Sourced::Fallback)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_clients(&self) -> ApiResult<Sourced<Vec<Client>>> {
        let remote = self.remote.list_clients().await;
        self.with_fallback("list_clients", remote, || self.local.list_clients())
            .await
    }

    pub async fn list_installations(
        &self,
        client_id: Option<&str>,
    ) -> ApiResult<Sourced<Vec<Installation>>> {
        let remote = self.remote.list_installations(client_id).await;
        self.with_fallback("list_installations", remote, || {
            self.local.list_installations(client_id)
        })
        .await
    }

    pub async fn power_series(
        &self,
        installation_id: &str,
        granularity: PowerGranularity,
        range: DateRange,
    ) -> ApiResult<Sourced<Vec<PowerData>>> {
        let remote = self
            .remote
            .power_series(installation_id, granularity, range)
            .await;
        self.with_fallback("power_series", remote, || {
            self.local.power_series(installation_id, granularity, range)
        })
        .await
    }

    pub async fn energy_series(
        &self,
        installation_id: &str,
        granularity: EnergyGranularity,
        range: DateRange,
    ) -> ApiResult<Sourced<Vec<EnergyData>>> {
        let remote = self
            .remote
            .energy_series(installation_id, granularity, range)
            .await;
        self.with_fallback("energy_series", remote, || {
            self.local.energy_series(installation_id, granularity, range)
        })
        .await
    }

    pub async fn weather_series(
        &self,
        installation_id: &str,
        range: DateRange,
    ) -> ApiResult<Sourced<Vec<WeatherData>>> {
        let remote = self.remote.weather_series(installation_id, range).await;
        self.with_fallback("weather_series", remote, || {
            self.local.weather_series(installation_id, range)
        })
        .await
    }

    pub async fn installation_detail(
        &self,
        installation_id: &str,
    ) -> ApiResult<Sourced<InstallationDetail>> {
        let remote = self.remote.installation_detail(installation_id).await;
        self.with_fallback("installation_detail", remote, || {
            self.local.installation_detail(installation_id)
        })
        .await
    }

    pub async fn list_issues(
        &self,
        installation_id: Option<&str>,
    ) -> ApiResult<Sourced<Vec<ProcessIssue>>> {
        let remote = self.remote.list_issues(installation_id).await;
        self.with_fallback("list_issues", remote, || {
            self.local.list_issues(installation_id)
        })
        .await
    }

    pub async fn monthly_report(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<Sourced<MonthlyReport>> {
        validate_month(month)?;
        let remote = self
            .remote
            .monthly_report(installation_id, month, year)
            .await;
        self.with_fallback("monthly_report", remote, || {
            self.local.monthly_report(installation_id, month, year)
        })
        .await
    }

    pub async fn generate_pdf_report(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<Sourced<PdfReport>> {
        validate_month(month)?;
        let remote = self
            .remote
            .generate_pdf_report(installation_id, month, year)
            .await;
        self.with_fallback("generate_pdf_report", remote, || {
            self.local.generate_pdf_report(installation_id, month, year)
        })
        .await
    }
}

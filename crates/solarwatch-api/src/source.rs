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

use crate::errors::ApiResult;
use async_trait::async_trait;
use solarwatch_types::{
    Client, DateRange, EnergyData, EnergyGranularity, Installation, InstallationDetail,
    MonthlyReport, PdfReport, PowerData, PowerGranularity, ProcessIssue, WeatherData,
};

/// One way of answering every dashboard data need.
///
/// Implemented by the HTTP backend client and by the local generator; the
/// provider combines one of each.
#[async_trait]
pub trait SolarDataSource: Send + Sync {
    async fn list_clients(&self) -> ApiResult<Vec<Client>>;

    /// All installations, or only those owned by `client_id`
    async fn list_installations(&self, client_id: Option<&str>) -> ApiResult<Vec<Installation>>;

    async fn power_series(
        &self,
        installation_id: &str,
        granularity: PowerGranularity,
        range: DateRange,
    ) -> ApiResult<Vec<PowerData>>;

    async fn energy_series(
        &self,
        installation_id: &str,
        granularity: EnergyGranularity,
        range: DateRange,
    ) -> ApiResult<Vec<EnergyData>>;

    async fn weather_series(
        &self,
        installation_id: &str,
        range: DateRange,
    ) -> ApiResult<Vec<WeatherData>>;

    /// Fails with `ApiError::NotFound` for unknown installations
    async fn installation_detail(&self, installation_id: &str) -> ApiResult<InstallationDetail>;

    /// All issues, or only those raised for `installation_id`
    async fn list_issues(&self, installation_id: Option<&str>) -> ApiResult<Vec<ProcessIssue>>;

    async fn monthly_report(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<MonthlyReport>;

    async fn generate_pdf_report(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<PdfReport>;
}

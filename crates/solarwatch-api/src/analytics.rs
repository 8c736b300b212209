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

//! Fleet-level views built from several provider calls

use crate::errors::ApiResult;
use crate::provider::SolarDataProvider;
use crate::source::SolarDataSource;
use futures_util::future::try_join_all;
use solarwatch_types::{
    ComparisonOverview, ComparisonPeriod, DashboardSummary, DateRange, InstallationComparison,
    MonthlyReport,
};
use tracing::debug;

/// Result of a fleet comparison
#[derive(Debug, Clone)]
pub struct FleetComparison {
    pub comparisons: Vec<InstallationComparison>,
    pub overview: ComparisonOverview,
    /// At least one of the underlying calls was answered locally
    pub used_fallback: bool,
}

/// Compare production of every installation (or one client's) over `period`.
///
/// Energy series are fetched concurrently, one per installation.
pub async fn compare_installations<R, L>(
    provider: &SolarDataProvider<R, L>,
    client_id: Option<&str>,
    period: ComparisonPeriod,
) -> ApiResult<FleetComparison>
where
    R: SolarDataSource,
    L: SolarDataSource,
{
    let installations = provider.list_installations(client_id).await?;
    let mut used_fallback = installations.is_fallback();
    let installations = installations.into_inner();

    debug!(
        "📊 Comparing {} installations over {} period",
        installations.len(),
        period
    );

    let series = try_join_all(installations.iter().map(|installation| {
        provider.energy_series(&installation.id, period.granularity(), DateRange::default())
    }))
    .await?;

    let comparisons: Vec<InstallationComparison> = installations
        .iter()
        .zip(series)
        .map(|(installation, energy)| {
            used_fallback |= energy.is_fallback();
            InstallationComparison::from_energy_series(installation, period, energy.get())
        })
        .collect();

    Ok(FleetComparison {
        overview: ComparisonOverview::from_comparisons(&installations, &comparisons),
        comparisons,
        used_fallback,
    })
}

/// Monthly reports for one installation, or for the whole fleet fetched concurrently
pub async fn monthly_reports<R, L>(
    provider: &SolarDataProvider<R, L>,
    installation_id: Option<&str>,
    month: u32,
    year: i32,
) -> ApiResult<Vec<MonthlyReport>>
where
    R: SolarDataSource,
    L: SolarDataSource,
{
    if let Some(id) = installation_id {
        let report = provider.monthly_report(id, month, year).await?;
        return Ok(vec![report.into_inner()]);
    }

    let installations = provider.list_installations(None).await?.into_inner();
    let reports = try_join_all(
        installations
            .iter()
            .map(|installation| provider.monthly_report(&installation.id, month, year)),
    )
    .await?;

    Ok(reports.into_iter().map(|r| r.into_inner()).collect())
}

/// Landing page headline figures.
///
/// Returns the summary and whether any of the three lists came from the fallback.
pub async fn dashboard_summary<R, L>(
    provider: &SolarDataProvider<R, L>,
) -> ApiResult<(DashboardSummary, bool)>
where
    R: SolarDataSource,
    L: SolarDataSource,
{
    let (installations, clients, issues) = futures_util::try_join!(
        provider.list_installations(None),
        provider.list_clients(),
        provider.list_issues(None),
    )?;

    let used_fallback =
        installations.is_fallback() || clients.is_fallback() || issues.is_fallback();
    let summary = DashboardSummary::from_parts(installations.get(), clients.get(), issues.get());

    Ok((summary, used_fallback))
}

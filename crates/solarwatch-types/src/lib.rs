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

//! Shared data contract for the SolarWatch monitoring dashboard.
//!
//! Every producer (remote API, local generator) and every consumer (dashboard pages,
//! CLI) exchanges exactly these shapes. Field names follow the camelCase JSON the
//! backend speaks.

pub mod analytics;
pub mod installation;
pub mod issues;
pub mod report;
pub mod series;

// Re-export common types for convenience
pub use analytics::{ComparisonOverview, ComparisonPeriod, DashboardSummary, InstallationComparison};
pub use installation::{Client, Installation, InstallationDetail, InstallationStatus};
pub use issues::{IssueSeverity, ProcessIssue};
pub use report::{MonthlyReport, PDF_MEDIA_TYPE, PdfReport};
pub use series::{
    DateRange, EnergyData, EnergyFlow, EnergyGranularity, PowerData, PowerGranularity,
    WeatherData,
};

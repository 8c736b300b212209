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

//! Data access layer for the SolarWatch monitoring dashboard.
//!
//! [`SolarDataProvider`] answers every data need from the monitoring backend and
//! falls back to [`LocalGenerator`] when the backend cannot be used. Results are
//! tagged with [`Sourced`] so callers can tell the two paths apart.

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod generator;
pub mod pdf;
pub mod provider;
pub mod remote;
pub mod source;

pub use analytics::{FleetComparison, compare_installations, dashboard_summary, monthly_reports};
pub use catalog::Catalog;
pub use config::{ApiConfig, DetailWeather, Endpoints, FallbackConfig};
pub use errors::{ApiError, ApiResult, validate_month};
pub use generator::LocalGenerator;
pub use provider::{SolarDataProvider, Sourced};
pub use remote::RemoteClient;
pub use source::SolarDataSource;

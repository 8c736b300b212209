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

//! Local data generator used when the backend is unreachable
//!
//! Shapes are deterministic and values are random:
//! - Every series has the cardinality and spacing its granularity implies
//! - Power and irradiation are zero outside the daylight window `[06:00, 18:00)`
//!   in the configured time zone
//! - Synthesized energy keeps `production + import == consumption + export`
//! - Catalog lookups never produce a dangling `clientId` / `installationId`

use crate::catalog::Catalog;
use crate::config::{DetailWeather, FallbackConfig};
use crate::errors::{ApiError, ApiResult, validate_month};
use crate::pdf;
use crate::source::SolarDataSource;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use rand::Rng;
use solarwatch_types::{
    Client, DateRange, EnergyData, EnergyFlow, EnergyGranularity, Installation,
    InstallationDetail, MonthlyReport, PdfReport, PowerData, PowerGranularity, ProcessIssue,
    WeatherData,
};
use std::time::Duration;
use tracing::debug;

/// Daylight window, local hours `[start, end)`
pub const DAYLIGHT_START_HOUR: u32 = 6;
pub const DAYLIGHT_END_HOUR: u32 = 18;

/// Plant size the value ranges are tuned for (kW). Unknown installations use it too.
const REFERENCE_PEAK_KW: f64 = 50.0;

/// Number of points in the weather series (hourly, last 24 h)
pub const WEATHER_POINTS: usize = 24;

/// Number of buckets generated for each granularity
pub fn series_len(granularity: PowerGranularity) -> usize {
    match granularity {
        PowerGranularity::FiveMinutes => 288, // last 24 hours
        PowerGranularity::Hourly => 168,      // last 7 days
        PowerGranularity::Daily => 30,
        PowerGranularity::Monthly => 12,
        PowerGranularity::Yearly => 5,
    }
}

/// One time bucket: representative timestamp and its width in hours
#[derive(Debug, Clone, Copy)]
struct Bucket {
    timestamp: DateTime<Utc>,
    hours: f64,
}

/// Fallback data source backed by an owned seed catalog
#[derive(Debug, Clone)]
pub struct LocalGenerator {
    catalog: Catalog,
    tz: Tz,
    detail_weather: DetailWeather,
    latency: Duration,
}

impl LocalGenerator {
    pub fn new(catalog: Catalog, tz: Tz) -> Self {
        Self {
            catalog,
            tz,
            detail_weather: DetailWeather::default(),
            latency: Duration::ZERO,
        }
    }

    /// Build from configuration, loading a custom catalog when one is configured
    pub fn from_config(config: &FallbackConfig) -> ApiResult<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_json_file(path)?,
            None => Catalog::demo(Utc::now()),
        };

        Ok(Self::new(catalog, config.tz()?)
            .with_detail_weather(config.detail_weather)
            .with_latency(config.simulated_latency()))
    }

    pub fn with_detail_weather(mut self, detail_weather: DetailWeather) -> Self {
        self.detail_weather = detail_weather;
        self
    }

    /// Delay every response, like a real backend round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Whether `timestamp` falls in the local daylight window
    pub fn is_daylight(&self, timestamp: DateTime<Utc>) -> bool {
        let hour = timestamp.with_timezone(&self.tz).hour();
        (DAYLIGHT_START_HOUR..DAYLIGHT_END_HOUR).contains(&hour)
    }

    fn peak_kw(&self, installation_id: &str) -> f64 {
        self.catalog
            .installation(installation_id)
            .map_or(REFERENCE_PEAK_KW, usable_kw)
    }

    fn require(&self, installation_id: &str) -> ApiResult<&Installation> {
        self.catalog
            .installation(installation_id)
            .ok_or_else(|| ApiError::NotFound(installation_id.to_string()))
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Local noon of `date`, so that day-or-longer buckets sit inside daylight
    fn local_noon(&self, date: NaiveDate) -> DateTime<Utc> {
        let noon = date.and_time(NaiveTime::MIN + TimeDelta::hours(12));
        self.tz
            .from_local_datetime(&noon)
            .earliest()
            .unwrap_or_else(|| self.tz.from_utc_datetime(&noon))
            .with_timezone(&Utc)
    }

    /// Ascending buckets ending at `now`
    fn buckets(&self, granularity: PowerGranularity, now: DateTime<Utc>) -> Vec<Bucket> {
        let count = series_len(granularity);
        let today = now.with_timezone(&self.tz).date_naive();

        let fixed = |step: TimeDelta| -> Vec<Bucket> {
            let hours = step.num_minutes() as f64 / 60.0;
            (0..count)
                .rev()
                .map(|i| Bucket {
                    timestamp: now - step * i as i32,
                    hours,
                })
                .collect()
        };

        // Calendar buckets: `first` is the first day of the current bucket
        let calendar = |first: NaiveDate, months_per_bucket: u32| -> Vec<Bucket> {
            (0..count)
                .rev()
                .filter_map(|i| {
                    let start =
                        first.checked_sub_months(Months::new(months_per_bucket * i as u32))?;
                    let end = start.checked_add_months(Months::new(months_per_bucket))?;
                    Some(Bucket {
                        timestamp: self.local_noon(start),
                        hours: (end - start).num_days() as f64 * 24.0,
                    })
                })
                .collect()
        };

        match granularity {
            PowerGranularity::FiveMinutes => fixed(TimeDelta::minutes(5)),
            PowerGranularity::Hourly => fixed(TimeDelta::hours(1)),
            PowerGranularity::Daily => (0..count)
                .rev()
                .map(|i| Bucket {
                    timestamp: self.local_noon(today - Days::new(i as u64)),
                    hours: 24.0,
                })
                .collect(),
            PowerGranularity::Monthly => {
                calendar(today - Days::new(u64::from(today.day0())), 1)
            }
            PowerGranularity::Yearly => {
                calendar(today - Days::new(u64::from(today.ordinal0())), 12)
            }
        }
    }

    /// Power series anchored at `now`
    pub fn power_series_at(
        &self,
        installation_id: &str,
        granularity: PowerGranularity,
        now: DateTime<Utc>,
    ) -> Vec<PowerData> {
        let peak = self.peak_kw(installation_id);
        let mut rng = rand::thread_rng();

        self.buckets(granularity, now)
            .into_iter()
            .map(|bucket| {
                let (power, irradiation) = if self.is_daylight(bucket.timestamp) {
                    (
                        peak * rng.gen_range(0.2..1.0),
                        rng.gen_range(200.0..800.0),
                    )
                } else {
                    (0.0, 0.0)
                };

                PowerData {
                    timestamp: bucket.timestamp,
                    power: round1(power),
                    irradiation: Some(round1(irradiation)),
                }
            })
            .collect()
    }

    /// Energy series anchored at `now`, four flows per timestamp
    pub fn energy_series_at(
        &self,
        installation_id: &str,
        granularity: EnergyGranularity,
        now: DateTime<Utc>,
    ) -> Vec<EnergyData> {
        let peak = self.peak_kw(installation_id);
        let load_scale = peak / REFERENCE_PEAK_KW;
        let granularity = PowerGranularity::from(granularity);
        let mut rng = rand::thread_rng();

        let buckets = self.buckets(granularity, now);
        let mut data = Vec::with_capacity(buckets.len() * EnergyFlow::all().len());

        for bucket in buckets {
            let (production, consumption) = if granularity.is_intraday() {
                let production = if self.is_daylight(bucket.timestamp) {
                    peak * rng.gen_range(0.0..1.0)
                } else {
                    0.0
                };
                (production, rng.gen_range(5.0..30.0) * load_scale)
            } else {
                // Capacity factor over the whole bucket, day and night
                (
                    peak * bucket.hours * rng.gen_range(0.10..0.25),
                    bucket.hours * rng.gen_range(5.0..30.0) * load_scale,
                )
            };

            let production = round1(production);
            let consumption = round1(consumption);
            let export = round1((production - consumption).max(0.0));
            let import = round1((consumption - production).max(0.0));

            for (flow, energy) in [
                (EnergyFlow::Production, production),
                (EnergyFlow::Consumption, consumption),
                (EnergyFlow::Export, export),
                (EnergyFlow::Import, import),
            ] {
                data.push(EnergyData {
                    timestamp: bucket.timestamp,
                    energy,
                    flow,
                });
            }
        }

        data
    }

    /// Hourly weather for the last 24 hours
    pub fn weather_series_at(&self, now: DateTime<Utc>) -> Vec<WeatherData> {
        let mut rng = rand::thread_rng();

        (0..WEATHER_POINTS)
            .rev()
            .map(|i| {
                let timestamp = now - TimeDelta::hours(i as i64);
                let irradiation = if self.is_daylight(timestamp) {
                    round1(rng.gen_range(100.0..600.0))
                } else {
                    0.0
                };

                WeatherData {
                    timestamp,
                    temperature: round1(rng.gen_range(15.0..30.0)),
                    humidity: round1(rng.gen_range(40.0..80.0)),
                    wind_speed: round1(rng.gen_range(2.0..15.0)),
                    irradiation,
                }
            })
            .collect()
    }

    pub fn installation_detail_at(
        &self,
        installation_id: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<InstallationDetail> {
        let installation = self.require(installation_id)?.clone();
        let peak = usable_kw(&installation);
        let scale = peak / REFERENCE_PEAK_KW;

        let current_power = if installation.status.is_producing() && self.is_daylight(now) {
            peak * rand::thread_rng().gen_range(0.2..1.0)
        } else {
            0.0
        };

        let weather_data = match self.detail_weather {
            DetailWeather::Empty => Vec::new(),
            DetailWeather::Generated => self.weather_series_at(now),
        };

        let mut rng = rand::thread_rng();
        Ok(InstallationDetail {
            current_power: round1(current_power),
            self_consumption: round1(rng.gen_range(20.0..100.0) * scale),
            energy_imported: round1(rng.gen_range(5.0..30.0) * scale),
            energy_exported: round1(rng.gen_range(10.0..80.0) * scale),
            power_history: self.power_series_at(
                installation_id,
                PowerGranularity::FiveMinutes,
                now,
            ),
            weather_data,
            installation,
        })
    }

    pub fn monthly_report_for(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<MonthlyReport> {
        validate_month(month)?;
        let installation = self.require(installation_id)?;
        let scale = usable_kw(installation) / REFERENCE_PEAK_KW;
        let mut rng = rand::thread_rng();

        let production = round1(rng.gen_range(1000.0..5000.0) * scale);
        let consumption = round1(rng.gen_range(800.0..3000.0) * scale);
        // Part of the overlap between production and consumption stays on site
        let self_consumed = round1(production.min(consumption) * rng.gen_range(0.5..0.9));

        Ok(MonthlyReport {
            installation_id: installation.id.clone(),
            month: MonthlyReport::month_label(month),
            year,
            total_production: production,
            total_consumption: consumption,
            total_export: round1(production - self_consumed),
            total_import: round1(consumption - self_consumed),
            efficiency: round1(rng.gen_range(75.0..95.0)),
        })
    }

    pub fn pdf_report_for(&self, installation_id: &str, month: u32, year: i32) -> PdfReport {
        let name = self
            .catalog
            .installation(installation_id)
            .map_or(installation_id, |i| i.name.as_str());

        let lines = vec![
            "SolarWatch monthly report".to_string(),
            String::new(),
            format!("Installation: {name} ({installation_id})"),
            format!("Period: {year}-{month:02}"),
            String::new(),
            "Generated offline. Figures are unavailable until the".to_string(),
            "monitoring backend is reachable again.".to_string(),
        ];

        PdfReport::new(pdf::render_text_page(&lines))
    }
}

#[async_trait]
impl SolarDataSource for LocalGenerator {
    async fn list_clients(&self) -> ApiResult<Vec<Client>> {
        self.simulate_latency().await;
        Ok(self.catalog.clients().to_vec())
    }

    async fn list_installations(&self, client_id: Option<&str>) -> ApiResult<Vec<Installation>> {
        self.simulate_latency().await;
        Ok(self.catalog.installations_for(client_id))
    }

    async fn power_series(
        &self,
        installation_id: &str,
        granularity: PowerGranularity,
        _range: DateRange,
    ) -> ApiResult<Vec<PowerData>> {
        self.simulate_latency().await;
        debug!("Generating {} power series for {}", granularity, installation_id);
        Ok(self.power_series_at(installation_id, granularity, Utc::now()))
    }

    async fn energy_series(
        &self,
        installation_id: &str,
        granularity: EnergyGranularity,
        _range: DateRange,
    ) -> ApiResult<Vec<EnergyData>> {
        self.simulate_latency().await;
        debug!("Generating {} energy series for {}", granularity, installation_id);
        Ok(self.energy_series_at(installation_id, granularity, Utc::now()))
    }

    async fn weather_series(
        &self,
        _installation_id: &str,
        _range: DateRange,
    ) -> ApiResult<Vec<WeatherData>> {
        self.simulate_latency().await;
        Ok(self.weather_series_at(Utc::now()))
    }

    async fn installation_detail(&self, installation_id: &str) -> ApiResult<InstallationDetail> {
        self.simulate_latency().await;
        self.installation_detail_at(installation_id, Utc::now())
    }

    async fn list_issues(&self, installation_id: Option<&str>) -> ApiResult<Vec<ProcessIssue>> {
        self.simulate_latency().await;
        Ok(self.catalog.issues_for(installation_id))
    }

    async fn monthly_report(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<MonthlyReport> {
        self.simulate_latency().await;
        self.monthly_report_for(installation_id, month, year)
    }

    async fn generate_pdf_report(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<PdfReport> {
        validate_month(month)?;
        self.simulate_latency().await;
        Ok(self.pdf_report_for(installation_id, month, year))
    }
}

/// Installed power as a generation bound; anything unusable produces nothing
fn usable_kw(installation: &Installation) -> f64 {
    let kw = installation.installed_power;
    if kw.is_finite() && kw > 0.0 { kw } else { 0.0 }
}

/// Round to one decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

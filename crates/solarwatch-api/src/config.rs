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

//! Backend endpoint table and fallback behaviour

use crate::errors::{ApiError, ApiResult};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const CONFIG_ENV: &str = "SOLARWATCH_CONFIG";
const DEFAULT_TOML_PATH: &str = "solarwatch.toml";
const DEFAULT_JSON_PATH: &str = "solarwatch.json";

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_timezone() -> String {
    // Seed catalog installations are in Poland
    "Europe/Warsaw".to_string()
}

/// Connection settings for the monitoring backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, endpoint paths are appended verbatim
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub endpoints: Endpoints,

    /// Whole-request timeout of the HTTP client (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub fallback: FallbackConfig,
}

/// Endpoint paths relative to `base_url`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
    pub installations: String,
    pub clients: String,
    pub power_data: String,
    pub energy_data: String,
    pub weather_data: String,
    pub reports: String,
    pub issues: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            installations: "/api/installations".to_string(),
            clients: "/api/clients".to_string(),
            power_data: "/api/power-data".to_string(),
            energy_data: "/api/energy-data".to_string(),
            weather_data: "/api/weather-data".to_string(),
            reports: "/api/reports".to_string(),
            issues: "/api/issues".to_string(),
        }
    }
}

/// What the local generator puts into `InstallationDetail::weather_data`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetailWeather {
    /// No weather history, as the dashboard mock always returned
    #[default]
    Empty,
    /// The same 24-point series `weather_series` produces
    Generated,
}

/// Local generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// IANA zone the daylight window is evaluated in
    pub timezone: String,

    pub detail_weather: DetailWeather,

    /// Artificial delay before each generated response (milliseconds)
    pub simulated_latency_ms: u64,

    /// JSON catalog replacing the built-in demo fixture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            detail_weather: DetailWeather::default(),
            simulated_latency_ms: 0,
            catalog_path: None,
        }
    }
}

impl FallbackConfig {
    pub fn tz(&self) -> ApiResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ApiError::ConfigError(format!("Invalid timezone '{}': {e}", self.timezone)))
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoints: Endpoints::default(),
            timeout_secs: default_timeout_secs(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration: `$SOLARWATCH_CONFIG`, then `solarwatch.toml`, then
    /// `solarwatch.json`, then defaults. Environment overrides apply last.
    pub fn load() -> ApiResult<Self> {
        let mut config = if let Ok(path) = std::env::var(CONFIG_ENV) {
            Self::load_from_path(Path::new(&path))?
        } else if Path::new(DEFAULT_TOML_PATH).exists() {
            Self::load_from_path(Path::new(DEFAULT_TOML_PATH))?
        } else if Path::new(DEFAULT_JSON_PATH).exists() {
            Self::load_from_path(Path::new(DEFAULT_JSON_PATH))?
        } else {
            warn!("No configuration file found, using defaults with environment overrides");
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML or JSON file, chosen by extension
    pub fn load_from_path(path: &Path) -> ApiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                ApiError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
            })?,
            _ => toml::from_str(&content).map_err(|e| {
                ApiError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
            })?,
        };

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `SOLARWATCH_API_URL` / `SOLARWATCH_TIMEZONE` style overrides
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SOLARWATCH_API_URL") {
            self.base_url = url;
        }
        if let Some(tz) = lookup("SOLARWATCH_TIMEZONE") {
            self.fallback.timezone = tz;
        }
        if let Some(timeout) = lookup("SOLARWATCH_TIMEOUT_SECS")
            && let Ok(secs) = timeout.parse::<u64>()
        {
            self.timeout_secs = secs;
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            ApiError::ConfigError(format!("Invalid base_url '{}': {e}", self.base_url))
        })?;

        if self.timeout_secs == 0 {
            return Err(ApiError::ConfigError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        self.fallback.tz()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

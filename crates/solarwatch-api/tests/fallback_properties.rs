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

//! Fallback behaviour of the data provider, exercised with the backend unreachable

use chrono::{TimeDelta, Timelike};
use solarwatch_api::{ApiConfig, ApiError, SolarDataProvider};
use solarwatch_types::{
    DateRange, EnergyFlow, EnergyGranularity, PDF_MEDIA_TYPE, PowerGranularity,
};

fn offline_config() -> ApiConfig {
    ApiConfig {
        // Discard port: connection refused immediately
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        ..ApiConfig::default()
    }
}

fn offline_provider() -> SolarDataProvider {
    SolarDataProvider::from_config(&offline_config()).unwrap()
}

fn expected_spacing(granularity: PowerGranularity) -> Option<TimeDelta> {
    match granularity {
        PowerGranularity::FiveMinutes => Some(TimeDelta::minutes(5)),
        PowerGranularity::Hourly => Some(TimeDelta::hours(1)),
        _ => None,
    }
}

#[tokio::test]
async fn series_have_contracted_cardinality_and_spacing() {
    let provider = offline_provider();

    for id in ["inst-001", "inst-002", "unknown-plant"] {
        for granularity in PowerGranularity::all() {
            let series = provider
                .power_series(id, *granularity, DateRange::default())
                .await
                .unwrap();
            assert!(series.is_fallback());

            let series = series.into_inner();
            assert_eq!(
                series.len(),
                solarwatch_api::generator::series_len(*granularity),
                "{granularity} for {id}"
            );
            assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
            if let Some(step) = expected_spacing(*granularity) {
                assert!(series.windows(2).all(|w| w[1].timestamp - w[0].timestamp == step));
            }
        }

        let five_min = provider
            .power_series(id, PowerGranularity::FiveMinutes, DateRange::default())
            .await
            .unwrap()
            .into_inner();
        let span = five_min[287].timestamp - five_min[0].timestamp;
        assert_eq!(span, TimeDelta::hours(24) - TimeDelta::minutes(5));

        let hourly = provider
            .energy_series(id, EnergyGranularity::Hourly, DateRange::default())
            .await
            .unwrap()
            .into_inner();
        assert_eq!(hourly.len(), 168 * EnergyFlow::all().len());
    }
}

#[tokio::test]
async fn energy_balance_holds_at_every_timestamp() {
    let provider = offline_provider();

    for granularity in EnergyGranularity::all() {
        let series = provider
            .energy_series("inst-003", *granularity, DateRange::default())
            .await
            .unwrap()
            .into_inner();

        for chunk in series.chunks(4) {
            let energy = |flow: EnergyFlow| {
                chunk
                    .iter()
                    .find(|d| d.flow == flow)
                    .map(|d| d.energy)
                    .unwrap()
            };
            let production = energy(EnergyFlow::Production);
            let consumption = energy(EnergyFlow::Consumption);
            let export = energy(EnergyFlow::Export);
            let import = energy(EnergyFlow::Import);

            assert!(((production + import) - (consumption + export)).abs() < 1e-6);
            assert!(export == 0.0 || import == 0.0);
        }
    }
}

#[tokio::test]
async fn no_production_outside_daylight() {
    let provider = offline_provider();
    let tz = provider.local().timezone();

    let power = provider
        .power_series("inst-001", PowerGranularity::FiveMinutes, DateRange::default())
        .await
        .unwrap()
        .into_inner();
    let weather = provider
        .weather_series("inst-001", DateRange::default())
        .await
        .unwrap()
        .into_inner();

    let is_night = |hour: u32| !(6..18).contains(&hour);

    for point in &power {
        if is_night(point.timestamp.with_timezone(&tz).hour()) {
            assert_eq!(point.power, 0.0);
            assert_eq!(point.irradiation, Some(0.0));
        }
    }
    for reading in &weather {
        if is_night(reading.timestamp.with_timezone(&tz).hour()) {
            assert_eq!(reading.irradiation, 0.0);
        }
    }
}

#[tokio::test]
async fn installation_filter_is_exact() {
    let provider = offline_provider();

    let all = provider.list_installations(None).await.unwrap().into_inner();
    assert_eq!(all.len(), provider.local().catalog().installations().len());

    for client in ["client-001", "client-002", "client-404"] {
        let filtered = provider
            .list_installations(Some(client))
            .await
            .unwrap()
            .into_inner();
        assert!(filtered.iter().all(|i| i.client_id == client));
        assert_eq!(
            filtered.len(),
            all.iter().filter(|i| i.client_id == client).count()
        );
    }
}

#[tokio::test]
async fn unknown_installation_detail_is_not_found_offline() {
    let provider = offline_provider();
    let result = provider.installation_detail("does-not-exist").await;
    assert!(matches!(result, Err(ApiError::NotFound(id)) if id == "does-not-exist"));
}

#[tokio::test]
async fn unknown_installation_detail_is_not_found_online() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/installations/does-not-exist/detail")
        .with_status(404)
        .create_async()
        .await;

    let config = ApiConfig {
        base_url: server.url(),
        ..ApiConfig::default()
    };
    let provider = SolarDataProvider::from_config(&config).unwrap();

    let result = provider.installation_detail("does-not-exist").await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn repeated_calls_have_identical_shape() {
    let provider = offline_provider();

    let first = provider
        .energy_series("inst-002", EnergyGranularity::Daily, DateRange::default())
        .await
        .unwrap()
        .into_inner();
    let second = provider
        .energy_series("inst-002", EnergyGranularity::Daily, DateRange::default())
        .await
        .unwrap()
        .into_inner();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.flow, b.flow);
    }

    let a = provider.installation_detail("inst-001").await.unwrap().into_inner();
    let b = provider.installation_detail("inst-001").await.unwrap().into_inner();
    assert_eq!(a.installation, b.installation);
    assert_eq!(a.power_history.len(), b.power_history.len());
    assert_eq!(a.weather_data.len(), b.weather_data.len());

    // Same field set on the wire
    let keys = |value: serde_json::Value| -> Vec<String> {
        value.as_object().unwrap().keys().cloned().collect()
    };
    assert_eq!(
        keys(serde_json::to_value(&a).unwrap()),
        keys(serde_json::to_value(&b).unwrap())
    );

    let issues_a = provider.list_issues(None).await.unwrap().into_inner();
    let issues_b = provider.list_issues(None).await.unwrap().into_inner();
    assert_eq!(issues_a, issues_b);
}

#[tokio::test]
async fn monthly_report_resolves_offline() {
    let provider = offline_provider();

    let inst = provider.local().catalog().installation("inst-001").unwrap();
    assert_eq!(inst.installed_power, 50.0);

    let report = provider.monthly_report("inst-001", 6, 2024).await.unwrap();
    assert!(report.is_fallback());

    let report = report.into_inner();
    assert_eq!(report.installation_id, "inst-001");
    assert_eq!(report.month, "06");
    assert_eq!(report.year, 2024);
    for total in [
        report.total_production,
        report.total_consumption,
        report.total_export,
        report.total_import,
    ] {
        assert!(total >= 0.0);
    }
}

#[tokio::test]
async fn pdf_report_is_always_pdf() {
    let offline = offline_provider();
    let pdf = offline.generate_pdf_report("inst-001", 6, 2024).await.unwrap();
    assert!(pdf.is_fallback());
    assert_eq!(pdf.get().media_type, PDF_MEDIA_TYPE);
    assert!(pdf.get().has_pdf_signature());

    // Unknown installations still get a document
    let pdf = offline.generate_pdf_report("inst-404", 6, 2024).await.unwrap();
    assert_eq!(pdf.get().media_type, PDF_MEDIA_TYPE);

    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/reports/pdf")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", PDF_MEDIA_TYPE)
        .with_body("%PDF-1.7 remote")
        .create_async()
        .await;

    let config = ApiConfig {
        base_url: server.url(),
        ..ApiConfig::default()
    };
    let online = SolarDataProvider::from_config(&config).unwrap();
    let pdf = online.generate_pdf_report("inst-001", 6, 2024).await.unwrap();
    assert!(pdf.is_remote());
    assert_eq!(pdf.get().media_type, PDF_MEDIA_TYPE);
    assert_eq!(pdf.get().bytes, b"%PDF-1.7 remote");
}

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

use crate::config::{ApiConfig, Endpoints};
use crate::errors::{ApiError, ApiResult, validate_month};
use crate::source::SolarDataSource;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use solarwatch_types::{
    Client as SolarClient, DateRange, EnergyData, EnergyGranularity, Installation,
    InstallationDetail, MonthlyReport, PDF_MEDIA_TYPE, PdfReport, PowerData, PowerGranularity,
    ProcessIssue, WeatherData,
};
use tracing::{debug, error, trace, warn};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Monitoring backend REST client.
///
/// Issues exactly one request per call; there is no retry. Failures are
/// returned to the caller, which decides whether to fall back.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
    endpoints: Endpoints,
    client: Client,
}

impl RemoteClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoints: config.endpoints.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Health check. Never errors: an unreachable backend is just `false`.
    pub async fn ping(&self) -> bool {
        let url = self.url(&self.endpoints.clients);
        match self.client.get(&url).header(ACCEPT, JSON_MEDIA_TYPE).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    warn!("Backend health check failed: status {}", response.status());
                }
                ok
            }
            Err(e) => {
                debug!("Backend health check failed: {}", e);
                false
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document.
    ///
    /// A 404 becomes `NotFound(id)` only when `not_found_id` is given; elsewhere a
    /// 404 just means the endpoint is missing and is reported as a status error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        not_found_id: Option<&str>,
    ) -> ApiResult<T> {
        let url = self.url(path);
        debug!("🔍 [API] GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            trace!("   {} bytes from {}", body.len(), path);
            return serde_json::from_slice::<T>(&body).map_err(|e| {
                error!("❌ [API] Malformed payload from {}: {}", path, e);
                ApiError::MalformedResponse {
                    endpoint: path.to_string(),
                    reason: e.to_string(),
                }
            });
        }

        if status == StatusCode::NOT_FOUND
            && let Some(id) = not_found_id
        {
            debug!("❌ [API] {} not found at {}", id, path);
            return Err(ApiError::NotFound(id.to_string()));
        }

        let message = response.text().await.unwrap_or_default();
        debug!("❌ [API] Status {} from {}: {}", status, path, message);
        Err(ApiError::ApiStatus {
            status: status.as_u16(),
            message,
        })
    }

    fn report_query(installation_id: &str, month: u32, year: i32) -> [(&'static str, String); 3] {
        [
            ("installation_id", installation_id.to_string()),
            ("month", month.to_string()),
            ("year", year.to_string()),
        ]
    }

    fn series_query(
        installation_id: &str,
        granularity: Option<&'static str>,
        range: DateRange,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![("installation_id", installation_id.to_string())];
        if let Some(granularity) = granularity {
            query.push(("granularity", granularity.to_string()));
        }
        query.extend(range.query_pairs());
        query
    }
}

#[async_trait]
impl SolarDataSource for RemoteClient {
    async fn list_clients(&self) -> ApiResult<Vec<SolarClient>> {
        self.get_json(&self.endpoints.clients, &[], None).await
    }

    async fn list_installations(&self, client_id: Option<&str>) -> ApiResult<Vec<Installation>> {
        let query: Vec<(&str, String)> = client_id
            .map(|id| ("client_id", id.to_string()))
            .into_iter()
            .collect();
        self.get_json(&self.endpoints.installations, &query, None)
            .await
    }

    async fn power_series(
        &self,
        installation_id: &str,
        granularity: PowerGranularity,
        range: DateRange,
    ) -> ApiResult<Vec<PowerData>> {
        let query = Self::series_query(installation_id, Some(granularity.as_str()), range);
        self.get_json(&self.endpoints.power_data, &query, None).await
    }

    async fn energy_series(
        &self,
        installation_id: &str,
        granularity: EnergyGranularity,
        range: DateRange,
    ) -> ApiResult<Vec<EnergyData>> {
        let query = Self::series_query(installation_id, Some(granularity.as_str()), range);
        self.get_json(&self.endpoints.energy_data, &query, None)
            .await
    }

    async fn weather_series(
        &self,
        installation_id: &str,
        range: DateRange,
    ) -> ApiResult<Vec<WeatherData>> {
        let query = Self::series_query(installation_id, None, range);
        self.get_json(&self.endpoints.weather_data, &query, None)
            .await
    }

    async fn installation_detail(&self, installation_id: &str) -> ApiResult<InstallationDetail> {
        let path = format!(
            "{}/{}/detail",
            self.endpoints.installations,
            urlencoding::encode(installation_id)
        );
        self.get_json(&path, &[], Some(installation_id)).await
    }

    async fn list_issues(&self, installation_id: Option<&str>) -> ApiResult<Vec<ProcessIssue>> {
        let query: Vec<(&str, String)> = installation_id
            .map(|id| ("installation_id", id.to_string()))
            .into_iter()
            .collect();
        self.get_json(&self.endpoints.issues, &query, None).await
    }

    async fn monthly_report(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<MonthlyReport> {
        validate_month(month)?;
        let path = format!("{}/monthly", self.endpoints.reports);
        let query = Self::report_query(installation_id, month, year);
        self.get_json(&path, &query, Some(installation_id)).await
    }

    async fn generate_pdf_report(
        &self,
        installation_id: &str,
        month: u32,
        year: i32,
    ) -> ApiResult<PdfReport> {
        validate_month(month)?;
        let url = self.url(&format!("{}/pdf", self.endpoints.reports));
        let query = Self::report_query(installation_id, month, year);
        debug!("📄 [API] POST {} {:?}", url, query);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, PDF_MEDIA_TYPE)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!("❌ [API] PDF generation failed with {}: {}", status, message);
            return Err(ApiError::ApiStatus {
                status: status.as_u16(),
                message,
            });
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !media_type.starts_with(PDF_MEDIA_TYPE) {
            return Err(ApiError::UnexpectedMediaType {
                expected: PDF_MEDIA_TYPE.to_string(),
                actual: media_type,
            });
        }

        let bytes = response.bytes().await?;
        debug!("✅ [API] Received {} byte PDF for {}", bytes.len(), installation_id);
        Ok(PdfReport::new(bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &Server) -> RemoteClient {
        let config = ApiConfig {
            base_url: server.url(),
            ..ApiConfig::default()
        };
        RemoteClient::new(&config).unwrap()
    }

    fn installation_json(id: &str, client_id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Remote Plant",
            "clientId": client_id,
            "clientName": "Remote Owner",
            "installedPower": 25.0,
            "location": "Prague",
            "status": "active",
            "lastUpdate": "2024-06-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_installations_with_client_filter() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/installations")
            .match_query(Matcher::UrlEncoded(
                "client_id".to_string(),
                "client-007".to_string(),
            ))
            .match_header("accept", JSON_MEDIA_TYPE)
            .with_status(200)
            .with_header("content-type", JSON_MEDIA_TYPE)
            .with_body(json!([installation_json("inst-700", "client-007")]).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let installations = client.list_installations(Some("client-007")).await.unwrap();

        assert_eq!(installations.len(), 1);
        assert_eq!(installations[0].id, "inst-700");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_power_series_query_parameters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/power-data")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("installation_id".to_string(), "inst-001".to_string()),
                Matcher::UrlEncoded("granularity".to_string(), "5min".to_string()),
                Matcher::UrlEncoded("start_date".to_string(), "2024-06-01".to_string()),
            ]))
            .with_status(200)
            .with_body(
                json!([
                    {"timestamp": "2024-06-01T12:00:00Z", "power": 30.5, "irradiation": 640.0},
                    {"timestamp": "2024-06-01T12:05:00Z", "power": 31.0}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let range = DateRange::new(chrono::NaiveDate::from_ymd_opt(2024, 6, 1), None);
        let series = client
            .power_series("inst-001", PowerGranularity::FiveMinutes, range)
            .await
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].irradiation, Some(640.0));
        assert!(series[1].irradiation.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/installations/does-not-exist/detail")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.installation_detail("does-not-exist").await;

        assert!(matches!(result, Err(ApiError::NotFound(id)) if id == "does-not-exist"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_404_is_status_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/issues")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.list_issues(None).await;

        assert!(matches!(result, Err(ApiError::ApiStatus { status: 404, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_single_attempt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/clients")
            .with_status(500)
            .with_body("boom")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.list_clients().await;

        match result {
            Err(ApiError::ApiStatus { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/clients")
            .with_status(200)
            .with_body(r#"{"not": "a list"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.list_clients().await;

        assert!(matches!(result, Err(ApiError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_monthly_report_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/reports/monthly")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("installation_id".to_string(), "inst-002".to_string()),
                Matcher::UrlEncoded("month".to_string(), "6".to_string()),
                Matcher::UrlEncoded("year".to_string(), "2024".to_string()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "installationId": "inst-002",
                    "month": "06",
                    "year": 2024,
                    "totalProduction": 1200.0,
                    "totalConsumption": 900.0,
                    "totalExport": 500.0,
                    "totalImport": 200.0,
                    "efficiency": 88.5
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let report = client.monthly_report("inst-002", 6, 2024).await.unwrap();

        assert_eq!(report.month, "06");
        assert_eq!(report.total_export, 500.0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pdf_report_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/reports/pdf")
            .match_query(Matcher::UrlEncoded(
                "installation_id".to_string(),
                "inst-001".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", PDF_MEDIA_TYPE)
            .with_body(b"%PDF-1.4 remote".as_slice())
            .create_async()
            .await;

        let client = client_for(&server);
        let pdf = client.generate_pdf_report("inst-001", 6, 2024).await.unwrap();

        assert_eq!(pdf.media_type, PDF_MEDIA_TYPE);
        assert_eq!(pdf.bytes, b"%PDF-1.4 remote".to_vec());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pdf_report_wrong_media_type() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/reports/pdf")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>login</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.generate_pdf_report("inst-001", 6, 2024).await;

        assert!(matches!(result, Err(ApiError::UnexpectedMediaType { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ApiConfig::default()
        };
        let client = RemoteClient::new(&config).unwrap();

        let result = client.list_clients().await;
        assert!(matches!(result, Err(ApiError::HttpError(_))));
        assert!(!client.ping().await);
    }

    #[tokio::test]
    async fn test_ping_success() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/clients")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.ping().await);
    }
}

//! HTTP client for the wqsrv API

use clearflow_quality::WaterQualityWire;
use common::ApiMessage;
use errors::{ClearFlowError, ClearFlowResult};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin wrapper over `reqwest::Client` bound to one server
#[derive(Debug, Clone)]
pub struct GaugeClient {
    http: reqwest::Client,
    base_url: String,
}

impl GaugeClient {
    pub fn new(base_url: impl Into<String>) -> ClearFlowResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/water-quality`, decoded leniently
    pub async fn fetch_snapshot(&self) -> ClearFlowResult<WaterQualityWire> {
        let endpoint = self.url("/api/water-quality");
        let response = self.http.get(&endpoint).send().await?;
        if !response.status().is_success() {
            return Err(ClearFlowError::UnexpectedStatus {
                endpoint,
                status: response.status().as_u16(),
            });
        }
        Ok(response.json::<WaterQualityWire>().await?)
    }

    /// POST a JSON body and expect `{ message }` back with a 2xx status
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> ClearFlowResult<ApiMessage> {
        let endpoint = self.url(path);
        let response = self.http.post(&endpoint).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!("POST {} -> {}: {}", endpoint, status, text);
            return Err(ClearFlowError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(response.json::<ApiMessage>().await?)
    }
}

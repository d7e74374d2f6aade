// HTTP metrics client for the GPU status endpoint
use crate::application::metrics_source::MetricsSource;
use crate::domain::metrics::{
    DeviceMetrics, FetchError, FetchResult, MemoryUsage, MetricsSnapshot, Reading,
};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpMetricsClient {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    gpus: Option<Vec<GpuRecord>>,
}

#[derive(Debug, Deserialize)]
struct GpuRecord {
    id: i64,
    name: String,
    memory: MemoryRecord,
    #[serde(default)]
    utilization: Reading,
    #[serde(default)]
    temperature: Reading,
    #[serde(default)]
    power: Reading,
}

#[derive(Debug, Deserialize)]
struct MemoryRecord {
    used_gb: f64,
    total_gb: f64,
    #[serde(default)]
    usage_percent: Option<f64>,
}

impl HttpMetricsClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_envelope(&self) -> Result<StatusEnvelope, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read response body: {}", e)))?;

        // An error status still counts as reported when the body carries an envelope
        match serde_json::from_slice::<StatusEnvelope>(&body) {
            Ok(envelope) if status.is_success() || !envelope.success => Ok(envelope),
            Ok(_) => Err(FetchError::Network(format!("endpoint returned {}", status))),
            Err(_) if !status.is_success() => {
                Err(FetchError::Network(format!("endpoint returned {}", status)))
            }
            Err(e) => Err(FetchError::Network(format!("failed to parse response: {}", e))),
        }
    }
}

impl StatusEnvelope {
    fn into_result(self) -> FetchResult {
        if !self.success {
            return Err(FetchError::reported(self.error));
        }
        let devices = self
            .gpus
            .unwrap_or_default()
            .into_iter()
            .map(GpuRecord::into_device)
            .collect();
        Ok(MetricsSnapshot::new(devices))
    }
}

impl GpuRecord {
    fn into_device(self) -> DeviceMetrics {
        let mut memory = MemoryUsage::new(self.memory.used_gb, self.memory.total_gb);
        if let Some(percent) = self.memory.usage_percent {
            memory.usage_percent = percent;
        }
        DeviceMetrics {
            id: self.id,
            name: self.name,
            memory,
            utilization: self.utilization,
            temperature: self.temperature,
            power: self.power,
        }
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsClient {
    async fn fetch_snapshot(&self) -> FetchResult {
        let envelope = self.fetch_envelope().await?;
        let result = envelope.into_result();
        match &result {
            Ok(snapshot) => tracing::debug!("Fetched {} device(s)", snapshot.devices.len()),
            Err(e) => tracing::debug!("Endpoint reported failure: {}", e),
        }
        result
    }
}

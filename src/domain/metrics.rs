// Device metrics domain models
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// A metric reading that the endpoint may report as unavailable.
///
/// The status endpoint marks an unmeasurable metric with a negative value
/// (usually `-1`). The raw value is kept as-is so that "unavailable" is never
/// confused with a genuine zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading(f64);

impl Reading {
    pub const ABSENT: Reading = Reading(-1.0);

    pub fn new(raw: f64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> Option<f64> {
        if self.0.is_finite() && self.0 >= 0.0 {
            Some(self.0)
        } else {
            None
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Self::ABSENT
    }
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `null` means the same thing as the negative sentinel
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.map(Reading::new).unwrap_or(Reading::ABSENT))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryUsage {
    pub used_gb: f64,
    pub total_gb: f64,
    pub usage_percent: f64,
}

impl MemoryUsage {
    pub fn new(used_gb: f64, total_gb: f64) -> Self {
        let usage_percent = if total_gb > 0.0 {
            used_gb / total_gb * 100.0
        } else {
            0.0
        };
        Self {
            used_gb,
            total_gb,
            usage_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceMetrics {
    pub id: i64,
    pub name: String,
    pub memory: MemoryUsage,
    pub utilization: Reading,
    pub temperature: Reading,
    pub power: Reading,
}

/// One point-in-time read of every device the endpoint reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub devices: Vec<DeviceMetrics>,
}

impl MetricsSnapshot {
    pub fn new(devices: Vec<DeviceMetrics>) -> Self {
        Self { devices }
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

pub const NETWORK_FAILURE_MESSAGE: &str = "Network connection failed";
pub const DEFAULT_REPORTED_MESSAGE: &str = "Failed to fetch GPU information";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport failure, bad status without a readable envelope, or unparsable body
    #[error("network failure: {0}")]
    Network(String),
    /// The endpoint answered with `success: false`
    #[error("{0}")]
    Reported(String),
}

impl FetchError {
    pub fn reported(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => FetchError::Reported(m),
            _ => FetchError::Reported(DEFAULT_REPORTED_MESSAGE.to_string()),
        }
    }

    /// Message shown in the panel body
    pub fn display_message(&self) -> &str {
        match self {
            FetchError::Network(_) => NETWORK_FAILURE_MESSAGE,
            FetchError::Reported(message) => message,
        }
    }
}

pub type FetchResult = Result<MetricsSnapshot, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_sentinel() {
        assert_eq!(Reading::new(-1.0).value(), None);
        assert_eq!(Reading::new(-0.5).value(), None);
        assert_eq!(Reading::new(0.0).value(), Some(0.0));
        assert_eq!(Reading::new(42.5).value(), Some(42.5));
        assert_eq!(Reading::new(f64::NAN).value(), None);
    }

    #[test]
    fn test_reading_deserializes_null_as_absent() {
        let reading: Reading = serde_json::from_str("null").unwrap();
        assert_eq!(reading, Reading::ABSENT);
        let reading: Reading = serde_json::from_str("0").unwrap();
        assert_eq!(reading.value(), Some(0.0));
    }

    #[test]
    fn test_memory_usage_derives_percent() {
        let memory = MemoryUsage::new(4.0, 8.0);
        assert_eq!(memory.usage_percent, 50.0);
        assert_eq!(MemoryUsage::new(1.0, 0.0).usage_percent, 0.0);
    }

    #[test]
    fn test_reported_error_default_message() {
        assert_eq!(
            FetchError::reported(None),
            FetchError::Reported(DEFAULT_REPORTED_MESSAGE.to_string())
        );
        assert_eq!(
            FetchError::reported(Some("driver missing".into())).display_message(),
            "driver missing"
        );
        assert_eq!(
            FetchError::Network("connection refused".into()).display_message(),
            NETWORK_FAILURE_MESSAGE
        );
    }
}

//! Health report types

use crate::config::FeatureFlags;
use crate::utils::error::CircuitBreakerMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status of one service at one probe instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// Status of the whole system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

/// Result of probing one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub service: String,
    pub status: ServiceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Round trip of a successful probe, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
}

impl HealthRecord {
    pub fn healthy(service: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            service: service.into(),
            status: ServiceStatus::Healthy,
            error: None,
            response_time: Some(response_time_ms),
        }
    }

    pub fn unhealthy(service: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            status: ServiceStatus::Unhealthy,
            error: Some(error.into()),
            response_time: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Combined view over every probed service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateHealth {
    pub status: OverallStatus,
    pub timestamp: DateTime<Utc>,
    pub services: Vec<HealthRecord>,
}

impl AggregateHealth {
    /// Healthy only when every record is healthy
    pub fn from_records(services: Vec<HealthRecord>) -> Self {
        let status = if services.iter().all(HealthRecord::is_healthy) {
            OverallStatus::Healthy
        } else {
            OverallStatus::Degraded
        };
        Self {
            status,
            timestamp: Utc::now(),
            services,
        }
    }
}

/// Memory held by the gateway process, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    /// Resident set size
    pub rss: u64,
    pub virtual_memory: u64,
    /// Physical memory of the host, for scale
    pub host_total: u64,
}

/// The aggregate plus static process metadata
#[derive(Debug, Clone, Serialize)]
pub struct DetailedHealth {
    #[serde(flatten)]
    pub aggregate: AggregateHealth,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub environment: String,
    /// Seconds since the gateway started
    pub uptime: u64,
    pub memory: MemoryInfo,
    pub features: FeatureFlags,
    /// Current breaker state of each service, keyed by service id
    pub breakers: BTreeMap<String, CircuitBreakerMetrics>,
}

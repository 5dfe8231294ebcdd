//! Concurrent health aggregation
//!
//! Every probe runs through its service's client, and so through that
//! service's breaker. A service whose circuit is open shows up as unhealthy
//! without being contacted.

use super::system::{ProcessInfo, memory_info};
use super::types::{AggregateHealth, DetailedHealth, HealthRecord};
use crate::core::client::{RequestOptions, ServiceClient};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

const HEALTH_PATH: &str = "/health";

/// Default budget of one probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone)]
pub struct HealthAggregator {
    probe_timeout: Duration,
}

impl Default for HealthAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl HealthAggregator {
    pub fn new(probe_timeout: Duration) -> Self {
        Self { probe_timeout }
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Probe every client concurrently and wait for all of them.
    ///
    /// A failed probe becomes an unhealthy record; it never aborts the others.
    /// Records come back in the order of `clients`.
    pub async fn check_system_health(&self, clients: &[Arc<ServiceClient>]) -> AggregateHealth {
        let probes = clients.iter().map(|client| self.probe(client));
        let records = join_all(probes).await;

        let health = AggregateHealth::from_records(records);
        debug!(status = ?health.status, services = health.services.len(), "System health aggregated");
        health
    }

    /// The aggregate enriched with process metadata and breaker states
    pub async fn detailed_health(
        &self,
        clients: &[Arc<ServiceClient>],
        info: &ProcessInfo,
    ) -> DetailedHealth {
        let aggregate = self.check_system_health(clients).await;
        let breakers = clients
            .iter()
            .map(|c| (c.name().id().to_string(), c.breaker().metrics()))
            .collect();

        DetailedHealth {
            aggregate,
            version: info.version.clone(),
            commit: info.commit.clone(),
            environment: info.environment.clone(),
            uptime: info.uptime_secs(),
            memory: memory_info(),
            features: info.features.clone(),
            breakers,
        }
    }

    async fn probe(&self, client: &ServiceClient) -> HealthRecord {
        let service = client.name().id();
        let started = Instant::now();
        let opts = RequestOptions::new().timeout(self.probe_timeout);

        match client.get(HEALTH_PATH, opts).await {
            Ok(_) => HealthRecord::healthy(service, started.elapsed().as_millis() as u64),
            Err(error) => {
                warn!(service, error = %error, "Health probe failed");
                HealthRecord::unhealthy(service, error.to_string())
            }
        }
    }
}

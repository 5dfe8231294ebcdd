//! One service client per downstream

use super::{ServiceDescriptor, ServiceEnvironment, ServiceName, resolve};
use crate::config::ServicesConfig;
use crate::core::client::ServiceClient;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Owns the service clients, and so the breakers, of every downstream.
///
/// Built once at startup. Each client keeps its own breaker; the registry only
/// hands out shared references.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    clients: BTreeMap<ServiceName, Arc<ServiceClient>>,
}

impl ServiceRegistry {
    /// Build a client for every known service.
    ///
    /// An explicit `url` override in configuration wins over environment
    /// resolution.
    pub fn from_config(
        config: &ServicesConfig,
        env: &ServiceEnvironment,
        http: reqwest::Client,
    ) -> Self {
        let clients = ServiceName::ALL
            .into_iter()
            .map(|name| {
                let base_url = config
                    .url_for(name)
                    .map(str::to_string)
                    .unwrap_or_else(|| resolve(name, env));
                info!(service = %name, base_url = %base_url, "Registered downstream service");

                let client = ServiceClient::new(
                    ServiceDescriptor::new(name, base_url),
                    config.breaker_for(name),
                    http.clone(),
                    config.request_timeout(),
                );
                (name, Arc::new(client))
            })
            .collect();

        Self { clients }
    }

    /// Registry over prebuilt clients
    pub fn from_clients(clients: impl IntoIterator<Item = Arc<ServiceClient>>) -> Self {
        Self {
            clients: clients.into_iter().map(|c| (c.name(), c)).collect(),
        }
    }

    pub fn get(&self, name: ServiceName) -> Option<Arc<ServiceClient>> {
        self.clients.get(&name).cloned()
    }

    /// Clients in registration order
    pub fn clients(&self) -> Vec<Arc<ServiceClient>> {
        self.clients.values().cloned().collect()
    }

    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.clients
            .values()
            .map(|c| c.descriptor().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

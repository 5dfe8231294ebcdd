//! Downstream service configuration

use super::*;
use crate::core::services::ServiceName;
use crate::utils::error::CircuitBreakerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Settings shared by every service client, plus per-service overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Executor timeout for one call, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Timeout of one `/health` probe, in milliseconds
    #[serde(default = "default_health_probe_timeout_ms")]
    pub health_probe_timeout_ms: u64,
    /// Breaker thresholds applied to every service
    #[serde(default)]
    pub breaker: CircuitBreakerConfig,
    /// Per-service overrides keyed by service id
    #[serde(default)]
    pub overrides: BTreeMap<ServiceName, ServiceOverride>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            health_probe_timeout_ms: default_health_probe_timeout_ms(),
            breaker: CircuitBreakerConfig::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl ServicesConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn health_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.health_probe_timeout_ms)
    }

    /// Breaker thresholds for one service after applying its override
    pub fn breaker_for(&self, service: ServiceName) -> CircuitBreakerConfig {
        match self.overrides.get(&service) {
            Some(o) => o.apply(&self.breaker),
            None => self.breaker.clone(),
        }
    }

    /// Explicit base URL configured for a service, if any
    pub fn url_for(&self, service: ServiceName) -> Option<&str> {
        self.overrides
            .get(&service)
            .and_then(|o| o.url.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Validate services configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_ms == 0 {
            return Err("Request timeout cannot be 0".to_string());
        }
        if self.health_probe_timeout_ms == 0 {
            return Err("Health probe timeout cannot be 0".to_string());
        }
        self.breaker.validate()?;

        for (service, o) in &self.overrides {
            o.apply(&self.breaker)
                .validate()
                .map_err(|e| format!("{}: {}", service, e))?;
            if let Some(url) = &o.url {
                let parsed = url::Url::parse(url)
                    .map_err(|e| format!("{}: invalid url '{}': {}", service, url, e))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(format!(
                        "{}: url must use http:// or https://, got {}",
                        service,
                        parsed.scheme()
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Optional per-service settings. Unset fields inherit the shared defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOverride {
    /// Explicit base URL, taking precedence over environment resolution
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub error_threshold_pct: Option<u32>,
    #[serde(default)]
    pub reset_timeout_ms: Option<u64>,
    #[serde(default)]
    pub volume_threshold: Option<u32>,
    #[serde(default)]
    pub rolling_window_ms: Option<u64>,
}

impl ServiceOverride {
    /// Layer this override on top of a base breaker config
    pub fn apply(&self, base: &CircuitBreakerConfig) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            timeout_ms: self.timeout_ms.unwrap_or(base.timeout_ms),
            error_threshold_pct: self.error_threshold_pct.unwrap_or(base.error_threshold_pct),
            reset_timeout_ms: self.reset_timeout_ms.unwrap_or(base.reset_timeout_ms),
            volume_threshold: self.volume_threshold.unwrap_or(base.volume_threshold),
            rolling_window_ms: self.rolling_window_ms.unwrap_or(base.rolling_window_ms),
        }
    }
}

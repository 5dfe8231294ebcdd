//! Feature flags reported by `/health/detailed`

use super::default_true;
use serde::{Deserialize, Serialize};

/// Fixed boolean flags. They describe the deployment; nothing toggles them at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    #[serde(default = "default_true")]
    pub circuit_breaker: bool,
    #[serde(default = "default_true")]
    pub health_aggregation: bool,
    #[serde(default = "default_true")]
    pub request_tracing: bool,
    #[serde(default = "default_true")]
    pub reverse_proxy: bool,
    #[serde(default = "default_true")]
    pub token_verification: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            circuit_breaker: true,
            health_aggregation: true,
            request_tracing: true,
            reverse_proxy: true,
            token_verification: true,
        }
    }
}

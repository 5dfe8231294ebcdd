//! Main gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Downstream service clients
    #[serde(default)]
    pub services: ServicesConfig,
    /// Flags surfaced in the detailed health report
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub logging: LoggingConfig,
}

//! Downstream service identities
//!
//! Every downstream the gateway talks to is a variant of [`ServiceName`], so
//! adding a service is a compile-checked change to this enum rather than a new
//! string key somewhere in configuration.

mod registry;
mod resolver;

pub use registry::ServiceRegistry;
pub use resolver::{ServiceEnvironment, resolve, resolve_by_name};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of one downstream service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceName {
    #[serde(rename = "auth-service")]
    Auth,
    #[serde(rename = "user-service")]
    User,
    #[serde(rename = "appointment-service")]
    Appointment,
    #[serde(rename = "report-service")]
    Report,
    #[serde(rename = "chat-service")]
    Chat,
    #[serde(rename = "blog-service")]
    Blog,
    #[serde(rename = "booking-service")]
    Booking,
}

impl ServiceName {
    /// All services, in registration order
    pub const ALL: [ServiceName; 7] = [
        ServiceName::Auth,
        ServiceName::User,
        ServiceName::Appointment,
        ServiceName::Report,
        ServiceName::Chat,
        ServiceName::Blog,
        ServiceName::Booking,
    ];

    /// Service id as used in DNS names and logs
    pub fn id(&self) -> &'static str {
        match self {
            ServiceName::Auth => "auth-service",
            ServiceName::User => "user-service",
            ServiceName::Appointment => "appointment-service",
            ServiceName::Report => "report-service",
            ServiceName::Chat => "chat-service",
            ServiceName::Blog => "blog-service",
            ServiceName::Booking => "booking-service",
        }
    }

    /// Environment variable overriding the local development address
    pub fn env_var(&self) -> &'static str {
        match self {
            ServiceName::Auth => "AUTH_SERVICE_URL",
            ServiceName::User => "USER_SERVICE_URL",
            ServiceName::Appointment => "APPOINTMENT_SERVICE_URL",
            ServiceName::Report => "REPORT_SERVICE_URL",
            ServiceName::Chat => "CHAT_SERVICE_URL",
            ServiceName::Blog => "BLOG_SERVICE_URL",
            ServiceName::Booking => "BOOKING_SERVICE_URL",
        }
    }

    /// Port the service listens on in local development
    pub fn default_port(&self) -> u16 {
        match self {
            ServiceName::Auth => 3001,
            ServiceName::User => 3002,
            ServiceName::Appointment => 3003,
            ServiceName::Report => 3004,
            ServiceName::Chat => 3005,
            ServiceName::Blog => 3006,
            ServiceName::Booking => 3007,
        }
    }

    pub fn local_default_url(&self) -> String {
        format!("http://localhost:{}", self.default_port())
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when a string does not name a known service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown service: {0}")]
pub struct UnknownService(pub String);

impl FromStr for ServiceName {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceName::ALL
            .into_iter()
            .find(|name| name.id() == s)
            .ok_or_else(|| UnknownService(s.to_string()))
    }
}

/// One downstream dependency: its name and resolved base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub name: ServiceName,
    pub base_url: String,
}

impl ServiceDescriptor {
    pub fn new(name: ServiceName, base_url: impl Into<String>) -> Self {
        Self {
            name,
            base_url: base_url.into(),
        }
    }

    /// Describe a service using the environment-aware resolution strategy
    pub fn resolve(name: ServiceName, env: &ServiceEnvironment) -> Self {
        Self::new(name, resolve(name, env))
    }
}

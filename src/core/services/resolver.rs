//! Environment-aware service URL resolution
//!
//! In production every service is addressed through its cluster DNS name. In
//! any other environment the address comes from `<SERVICE>_SERVICE_URL`, or a
//! localhost default. Resolution reads only the [`ServiceEnvironment`] it is
//! handed, so the same snapshot always yields the same address.

use super::ServiceName;
use std::collections::BTreeMap;
use std::ffi::OsString;

const NODE_ENV: &str = "NODE_ENV";
const K8S_NAMESPACE: &str = "K8S_NAMESPACE";
const DEFAULT_NAMESPACE: &str = "default";

/// Snapshot of the environment variables that drive resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceEnvironment {
    vars: BTreeMap<String, String>,
}

impl ServiceEnvironment {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// Build from raw OS strings, skipping variables whose name or value is
    /// not valid UTF-8
    pub fn from_os_pairs(pairs: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        Self::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Value of a variable, treating an empty value as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Deployment environment name, `development` when unset
    pub fn environment(&self) -> &str {
        self.get(NODE_ENV).unwrap_or("development")
    }

    pub fn is_production(&self) -> bool {
        self.get(NODE_ENV) == Some("production")
    }

    pub fn namespace(&self) -> &str {
        self.get(K8S_NAMESPACE).unwrap_or(DEFAULT_NAMESPACE)
    }
}

fn cluster_url(service_id: &str, env: &ServiceEnvironment) -> String {
    format!(
        "http://{}.{}.svc.cluster.local",
        service_id,
        env.namespace()
    )
}

/// Resolve the base URL of a known service
pub fn resolve(service: ServiceName, env: &ServiceEnvironment) -> String {
    if env.is_production() {
        return cluster_url(service.id(), env);
    }

    env.get(service.env_var())
        .map(str::to_string)
        .unwrap_or_else(|| service.local_default_url())
}

/// Resolve a service given by name.
///
/// Production addresses are pure string construction, so any name resolves.
/// Elsewhere an unknown name yields `None`, which callers must treat as a
/// configuration error.
pub fn resolve_by_name(name: &str, env: &ServiceEnvironment) -> Option<String> {
    if env.is_production() {
        return Some(cluster_url(name, env));
    }

    name.parse::<ServiceName>()
        .ok()
        .map(|service| resolve(service, env))
}

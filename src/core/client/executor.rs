//! Outbound HTTP execution
//!
//! The executor performs exactly one call. It knows nothing about the
//! breaker; the service client wraps it.

use super::types::RequestSpec;
use crate::core::services::ServiceDescriptor;
use crate::utils::error::ServiceCallError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Performs one outbound call and returns the parsed response body
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, spec: RequestSpec) -> Result<Value, ServiceCallError>;
}

/// `reqwest`-backed executor bound to one downstream service
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    descriptor: ServiceDescriptor,
    client: Client,
}

impl HttpExecutor {
    pub fn new(descriptor: ServiceDescriptor, client: Client) -> Self {
        Self { descriptor, client }
    }

    fn url(&self, path: &str) -> String {
        let base = self.descriptor.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Parse a response body: empty is `null`, anything that is not JSON is kept
/// as a JSON string
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Message for a non-2xx response
pub fn error_message(status: u16, body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status code {}", status))
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, spec: RequestSpec) -> Result<Value, ServiceCallError> {
        let service = self.descriptor.name.id();
        let url = self.url(&spec.path);
        debug!(service, method = %spec.method, url = %url, "Executing service request");

        let mut request = self
            .client
            .request(spec.method, &url)
            .timeout(spec.timeout);
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceCallError::timeout(service, spec.timeout)
            } else {
                ServiceCallError::network(service, e.to_string())
            }
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ServiceCallError::timeout(service, spec.timeout)
            } else {
                ServiceCallError::network(service, e.to_string())
            }
        })?;
        let body = parse_body(&bytes);

        if status.is_success() {
            Ok(body)
        } else {
            let code = status.as_u16();
            Err(ServiceCallError::http(service, code, error_message(code, &body)))
        }
    }
}

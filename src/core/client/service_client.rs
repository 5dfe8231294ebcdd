//! Breaker-guarded client for one downstream service

use super::executor::{HttpExecutor, RequestExecutor};
use super::types::{
    DEFAULT_REQUEST_TIMEOUT, FORWARDED_HEADERS, Headers, RequestOptions, RequestSpec,
};
use crate::core::services::{ServiceDescriptor, ServiceName};
use crate::utils::error::{CircuitBreaker, CircuitBreakerConfig, LoggingObserver, ServiceCallError};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for one named downstream service.
///
/// Owns its breaker; no other client ever sees it. Every verb method goes
/// through [`CircuitBreaker::call`], so an open circuit rejects without I/O.
pub struct ServiceClient {
    descriptor: ServiceDescriptor,
    breaker: CircuitBreaker,
    executor: Arc<dyn RequestExecutor>,
    default_timeout: Duration,
}

impl ServiceClient {
    /// Build a client backed by the shared `reqwest` pool
    pub fn new(
        descriptor: ServiceDescriptor,
        breaker_config: CircuitBreakerConfig,
        http: reqwest::Client,
        default_timeout: Duration,
    ) -> Self {
        let executor = Arc::new(HttpExecutor::new(descriptor.clone(), http));
        Self::with_executor(descriptor, breaker_config, executor, default_timeout)
    }

    /// Build a client around any executor
    pub fn with_executor(
        descriptor: ServiceDescriptor,
        breaker_config: CircuitBreakerConfig,
        executor: Arc<dyn RequestExecutor>,
        default_timeout: Duration,
    ) -> Self {
        let breaker = CircuitBreaker::new(descriptor.name.id(), breaker_config);
        breaker.subscribe(Arc::new(LoggingObserver));
        Self {
            descriptor,
            breaker,
            executor,
            default_timeout,
        }
    }

    /// Client with the default breaker thresholds and request timeout
    pub fn with_defaults(descriptor: ServiceDescriptor, http: reqwest::Client) -> Self {
        Self::new(
            descriptor,
            CircuitBreakerConfig::default(),
            http,
            DEFAULT_REQUEST_TIMEOUT,
        )
    }

    pub fn name(&self) -> ServiceName {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub async fn get(&self, path: &str, opts: RequestOptions) -> Result<Value, ServiceCallError> {
        self.request(Method::GET, path, None, opts).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Value,
        opts: RequestOptions,
    ) -> Result<Value, ServiceCallError> {
        self.request(Method::POST, path, Some(body), opts).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Value,
        opts: RequestOptions,
    ) -> Result<Value, ServiceCallError> {
        self.request(Method::PUT, path, Some(body), opts).await
    }

    pub async fn delete(
        &self,
        path: &str,
        opts: RequestOptions,
    ) -> Result<Value, ServiceCallError> {
        self.request(Method::DELETE, path, None, opts).await
    }

    /// Relay a call on behalf of an inbound request.
    ///
    /// Only the correlation, authorization and forwarded-for headers are taken
    /// from `original`; headers in `opts` take precedence over them. Method and
    /// body come from `opts`, defaulting to a bodiless GET.
    pub async fn forward(
        &self,
        path: &str,
        original: &Headers,
        mut opts: RequestOptions,
    ) -> Result<Value, ServiceCallError> {
        let mut headers = forwarded_subset(original);
        headers.extend(
            std::mem::take(&mut opts.headers)
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value)),
        );
        opts.headers = headers;

        let method = opts.method.take().unwrap_or(Method::GET);
        let body = opts.body.take();
        self.request(method, path, body, opts).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        opts: RequestOptions,
    ) -> Result<Value, ServiceCallError> {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.extend(
            opts.headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value)),
        );

        let spec = RequestSpec {
            method,
            path: path.to_string(),
            headers,
            body,
            timeout: opts.timeout.unwrap_or(self.default_timeout),
        };
        let executor = &self.executor;

        let result = self.breaker.call(move || executor.execute(spec)).await;
        if let Err(error) = &result {
            if error.is_circuit_open() {
                debug!(service = %self.descriptor.name, path, "Call rejected by open circuit");
            } else {
                warn!(service = %self.descriptor.name, path, error = %error, "Service call failed");
            }
        }
        result
    }
}

/// The whitelisted subset of inbound headers, matched case-insensitively
pub fn forwarded_subset(original: &Headers) -> Headers {
    original
        .iter()
        .filter_map(|(name, value)| {
            let name = name.to_ascii_lowercase();
            FORWARDED_HEADERS
                .contains(&name.as_str())
                .then(|| (name, value.clone()))
        })
        .collect()
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("descriptor", &self.descriptor)
            .field("breaker", &self.breaker)
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

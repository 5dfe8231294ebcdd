//! Token verification through the auth service

use super::service_client::ServiceClient;
use super::types::{Headers, RequestOptions};
use crate::utils::error::ServiceCallError;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

const VERIFY_PATH: &str = "/api/auth/verify";

/// Verifies bearer tokens by asking the auth service.
///
/// The gateway never inspects tokens itself; it only relays them.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    auth: Arc<ServiceClient>,
}

impl TokenVerifier {
    pub fn new(auth: Arc<ServiceClient>) -> Self {
        Self { auth }
    }

    /// Verify a raw token, returning the claims the auth service reports
    pub async fn verify_token(&self, token: &str) -> Result<Value, ServiceCallError> {
        let mut headers = Headers::new();
        headers.insert("authorization".to_string(), format!("Bearer {}", token));
        self.verify_request(&headers).await
    }

    /// Verify the credentials carried by an inbound request
    pub async fn verify_request(&self, original: &Headers) -> Result<Value, ServiceCallError> {
        self.auth
            .forward(VERIFY_PATH, original, RequestOptions::new().method(Method::POST))
            .await
    }
}

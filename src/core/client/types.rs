//! Request types shared by the executor and the service client

use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Header map with lowercase keys, so every key is unique regardless of the
/// casing the caller used
pub type Headers = BTreeMap<String, String>;

/// Headers `forward` copies from an inbound request. Nothing else is propagated.
pub const FORWARDED_HEADERS: [&str; 3] = ["x-request-id", "authorization", "x-forwarded-for"];

/// Default per-call executor timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Normalize a set of header pairs into a [`Headers`] map.
///
/// Later pairs overwrite earlier ones that differ only in case.
pub fn normalize_headers<I, K, V>(pairs: I) -> Headers
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
        .collect()
}

/// One outbound call
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub headers: Headers,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Caller-supplied options for a single call
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Headers,
    pub timeout: Option<Duration>,
    /// Only consulted by `forward`; the verb methods fix their own method
    pub method: Option<Method>,
    /// Only consulted by `forward`
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

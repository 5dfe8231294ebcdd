//! Transparent reverse proxy
//!
//! Requests whose path falls under a configured prefix are relayed verbatim to
//! that service's base URL. Proxying deliberately bypasses the circuit
//! breakers: callers see exactly what the downstream returned.

use crate::core::services::{ServiceName, ServiceRegistry};
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, warn};

/// Headers meaningful only for a single hop, never relayed in either direction
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

/// Default prefix table
pub const DEFAULT_ROUTES: [(&str, ServiceName); 7] = [
    ("/api/auth", ServiceName::Auth),
    ("/api/users", ServiceName::User),
    ("/api/appointments", ServiceName::Appointment),
    ("/api/reports", ServiceName::Report),
    ("/api/chat", ServiceName::Chat),
    ("/api/blog", ServiceName::Blog),
    ("/api/bookings", ServiceName::Booking),
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// One prefix and the address it forwards to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRoute {
    pub prefix: String,
    pub service: ServiceName,
    pub base_url: String,
}

impl ProxyRoute {
    /// Whether `path` is the prefix itself or lies under it
    fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Static prefix table, resolved to base URLs at startup
#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    /// Longest prefix first
    routes: Vec<ProxyRoute>,
}

impl ProxyTable {
    pub fn new(routes: impl IntoIterator<Item = ProxyRoute>) -> Self {
        let mut routes: Vec<ProxyRoute> = routes
            .into_iter()
            .map(|mut r| {
                let trimmed = r.prefix.trim_end_matches('/');
                r.prefix = trimmed.to_string();
                r
            })
            .collect();
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { routes }
    }

    /// Default table addressed through the registry's resolved base URLs
    pub fn from_registry(registry: &ServiceRegistry) -> Self {
        Self::new(DEFAULT_ROUTES.iter().filter_map(|(prefix, service)| {
            registry.get(*service).map(|client| ProxyRoute {
                prefix: prefix.to_string(),
                service: *service,
                base_url: client.descriptor().base_url.clone(),
            })
        }))
    }

    /// Longest prefix matching on a segment boundary
    pub fn match_path(&self, path: &str) -> Option<&ProxyRoute> {
        self.routes.iter().find(|route| route.matches(path))
    }

    pub fn routes(&self) -> &[ProxyRoute] {
        &self.routes
    }
}

/// `x-forwarded-for` with the peer appended to any inbound chain
fn forwarded_for(req: &HttpRequest) -> Option<String> {
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    let inbound = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    match (inbound, peer) {
        (Some(chain), Some(peer)) => Some(format!("{}, {}", chain, peer)),
        (Some(chain), None) => Some(chain.to_string()),
        (None, Some(peer)) => Some(peer),
        (None, None) => None,
    }
}

/// Fallback handler relaying every unrouted request
pub async fn proxy_request(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let path = req.path();
    let route = state
        .proxy
        .match_path(path)
        .ok_or_else(|| GatewayError::not_found(format!("No route for {}", path)))?;

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(path);
    let target = format!("{}{}", route.base_url.trim_end_matches('/'), path_and_query);
    debug!(service = %route.service, method = %req.method(), target = %target, "Proxying request");

    let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|e| GatewayError::Internal(format!("Unsupported method: {}", e)))?;

    let mut upstream = state
        .proxy_client
        .request(method, &target)
        .timeout(state.config.server().proxy_timeout());
    for (name, value) in req.headers() {
        if is_hop_by_hop(name.as_str())
            || name.as_str().eq_ignore_ascii_case("content-length")
            || name.as_str().eq_ignore_ascii_case("x-forwarded-for")
        {
            continue;
        }
        upstream = upstream.header(name.as_str(), value.as_bytes());
    }
    if let Some(chain) = forwarded_for(&req) {
        upstream = upstream.header("x-forwarded-for", chain);
    }
    if !body.is_empty() {
        upstream = upstream.body(body.to_vec());
    }

    let response = upstream.send().await.map_err(|e| {
        warn!(service = %route.service, error = %e, "Proxy request failed");
        if e.is_timeout() {
            GatewayError::GatewayTimeout(format!("{} did not respond in time", route.service))
        } else {
            GatewayError::BadGateway(format!("{} is unreachable", route.service))
        }
    })?;

    let status = StatusCode::from_u16(response.status().as_u16())
        .map_err(|e| GatewayError::BadGateway(format!("Invalid upstream status: {}", e)))?;
    let mut builder = HttpResponse::build(status);
    for (name, value) in response.headers() {
        if is_hop_by_hop(name.as_str()) || name.as_str().eq_ignore_ascii_case("content-length") {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            builder.append_header((name, value));
        }
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            GatewayError::GatewayTimeout(format!("{} did not respond in time", route.service))
        } else {
            GatewayError::BadGateway(format!("Failed to read {} response: {}", route.service, e))
        }
    })?;

    Ok(builder.body(bytes))
}

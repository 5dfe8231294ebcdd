//! Resilient service-to-service client

mod executor;
mod service_client;
mod types;
mod verifier;


pub use executor::{HttpExecutor, RequestExecutor, error_message, parse_body};
pub use service_client::{ServiceClient, forwarded_subset};
pub use types::{
    DEFAULT_REQUEST_TIMEOUT, FORWARDED_HEADERS, Headers, RequestOptions, RequestSpec,
    normalize_headers,
};
pub use verifier::TokenVerifier;

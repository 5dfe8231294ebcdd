//! Core functionality for the Gateway
//!
//! - `services` - Service identities, URL resolution and the client registry
//! - `client` - Breaker-guarded service client and token verification
//! - `health` - System-wide health aggregation

pub mod client;
pub mod health;
pub mod services;

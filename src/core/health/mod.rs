//! System-wide health reporting
//!
//! - `types` - Health records and the aggregate report
//! - `aggregator` - Concurrent settle-all probing of every downstream
//! - `system` - Process metadata for the detailed report

pub mod aggregator;
pub mod system;
pub mod types;

pub use aggregator::{DEFAULT_PROBE_TIMEOUT, HealthAggregator};
pub use system::{ProcessInfo, memory_info};
pub use types::{
    AggregateHealth, DetailedHealth, HealthRecord, MemoryInfo, OverallStatus, ServiceStatus,
};

//! Process metadata for the detailed health report

use super::types::MemoryInfo;
use crate::config::FeatureFlags;
#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tokio::time::Instant;

#[cfg(feature = "metrics")]
static SYSTEM: Lazy<parking_lot::Mutex<System>> =
    Lazy::new(|| parking_lot::Mutex::new(System::new()));

/// Memory of the current process. Only this process is refreshed, never the
/// whole process table.
#[cfg(feature = "metrics")]
pub fn memory_info() -> MemoryInfo {
    let mut sys = SYSTEM.lock();
    sys.refresh_memory();
    let host_total = sys.total_memory();

    let Ok(pid) = sysinfo::get_current_pid() else {
        return MemoryInfo {
            host_total,
            ..MemoryInfo::default()
        };
    };
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::new().with_memory(),
    );

    match sys.process(pid) {
        Some(process) => MemoryInfo {
            rss: process.memory(),
            virtual_memory: process.virtual_memory(),
            host_total,
        },
        None => MemoryInfo {
            host_total,
            ..MemoryInfo::default()
        },
    }
}

#[cfg(not(feature = "metrics"))]
pub fn memory_info() -> MemoryInfo {
    MemoryInfo::default()
}

/// Static facts about this gateway process
#[derive(Debug, Clone)]
pub struct ProcessInfo {
    pub version: String,
    pub environment: String,
    pub features: FeatureFlags,
    /// Source revision the binary was built from
    pub commit: Option<String>,
    started_at: Instant,
}

impl ProcessInfo {
    pub fn new(
        version: impl Into<String>,
        environment: impl Into<String>,
        features: FeatureFlags,
    ) -> Self {
        Self {
            version: version.into(),
            environment: environment.into(),
            features,
            commit: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// Whole seconds since the process info was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

//! Simulated system monitor for the dashboard.
//!
//! A `Monitor` is constructed with its data source and passed to whoever
//! needs it; there is no global instance. `start` schedules a periodic
//! refresh and `stop` cancels it. Control operations only touch the in-memory
//! records.

pub mod source;
pub mod types;

pub use source::{default_endpoints, MonitorSource, SimulatedSource};
pub use types::{
    AppKind, AppStatus, McpEndpoint, McpServer, MonitorSnapshot, RunningApp, ServerKind,
    ServerStatus, SystemStats,
};

use std::sync::{Arc, Mutex, RwLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Timing and size limits for a monitor.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Period between refreshes.
    pub interval: Duration,
    /// Servers kept per refresh.
    pub max_servers: usize,
    /// Delay before the server rescan that follows a restart.
    pub rescan_delay: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_servers: 8,
            rescan_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Default)]
struct MonitorData {
    apps: Vec<RunningApp>,
    servers: Vec<McpServer>,
    stats: SystemStats,
    refreshed_at: Option<chrono::DateTime<chrono::Local>>,
}

struct MonitorInner {
    source: Arc<dyn MonitorSource>,
    settings: MonitorSettings,
    data: RwLock<MonitorData>,
    /// Periodic refresh task; `Some` while running.
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for MonitorInner {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().ok().and_then(Option::take) {
            task.abort();
        }
    }
}

/// Handle to a monitor. Clones share the same state.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

impl Monitor {
    pub fn new(source: Arc<dyn MonitorSource>, settings: MonitorSettings) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                source,
                settings,
                data: RwLock::new(MonitorData::default()),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.inner.settings
    }

    pub fn is_running(&self) -> bool {
        self.lock_task().is_some()
    }

    /// Starts monitoring: one refresh now, then one per interval.
    ///
    /// Returns false, and schedules nothing, when already running.
    pub async fn start(&self) -> bool {
        {
            let mut task = self.lock_task();
            if task.is_some() {
                return false;
            }
            // The loop's first tick is one interval out; the initial refresh
            // below happens inline.
            *task = Some(spawn_refresh_loop(
                Arc::downgrade(&self.inner),
                self.inner.settings.interval,
            ));
        }
        tracing::info!(
            interval_ms = self.inner.settings.interval.as_millis() as u64,
            "starting system monitoring"
        );
        self.refresh().await;
        true
    }

    /// Stops monitoring. Records are kept as last refreshed.
    pub fn stop(&self) {
        if let Some(task) = self.lock_task().take() {
            task.abort();
            tracing::info!("stopped system monitoring");
        }
    }

    /// Regenerates all three datasets. Each generator fails on its own:
    /// apps fall back to empty, servers to the source's fallback list, and
    /// stats keep their previous value.
    pub async fn refresh(&self) {
        refresh_inner(&self.inner).await;
    }

    pub fn running_apps(&self) -> Vec<RunningApp> {
        self.read_data(|data| data.apps.clone())
    }

    pub fn mcp_servers(&self) -> Vec<McpServer> {
        self.read_data(|data| data.servers.clone())
    }

    pub fn system_stats(&self) -> SystemStats {
        self.read_data(|data| data.stats.clone())
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.read_data(|data| MonitorSnapshot {
            running_apps: data.apps.clone(),
            mcp_servers: data.servers.clone(),
            system_stats: data.stats.clone(),
            refreshed_at: data.refreshed_at,
        })
    }

    /// Drops the app from the list. False when the id is unknown.
    pub fn stop_app(&self, app_id: &str) -> bool {
        self.write_data(|data| {
            let Some(app) = data.apps.iter().find(|a| a.id == app_id) else {
                return false;
            };
            tracing::info!(app = %app.name, pid = app.pid, "stopping app (simulated)");
            data.apps.retain(|a| a.id != app_id);
            true
        })
    }

    /// Marks the app active. False when the id is unknown.
    pub fn restart_app(&self, app_id: &str) -> bool {
        self.write_data(|data| match data.apps.iter_mut().find(|a| a.id == app_id) {
            Some(app) => {
                tracing::info!(app = %app.name, "restarting app (simulated)");
                app.status = AppStatus::Active;
                true
            }
            None => false,
        })
    }

    /// Marks the server offline. False when the id is unknown.
    pub fn stop_server(&self, server_id: &str) -> bool {
        self.write_data(|data| match data.servers.iter_mut().find(|s| s.id == server_id) {
            Some(server) => {
                tracing::info!(server = %server.name, "stopping MCP server (simulated)");
                server.status = ServerStatus::Offline;
                true
            }
            None => false,
        })
    }

    /// Marks the server reconnecting and rescans servers after the rescan
    /// delay. False when the id is unknown.
    ///
    /// Must be called from within a tokio runtime.
    pub fn restart_server(&self, server_id: &str) -> bool {
        let found = self.write_data(|data| {
            match data.servers.iter_mut().find(|s| s.id == server_id) {
                Some(server) => {
                    tracing::info!(server = %server.name, "restarting MCP server (simulated)");
                    server.status = ServerStatus::Reconnecting;
                    true
                }
                None => false,
            }
        });
        if found {
            let weak = Arc::downgrade(&self.inner);
            let delay = self.inner.settings.rescan_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Some(inner) = weak.upgrade() {
                    rescan_servers(&inner).await;
                }
            });
        }
        found
    }

    fn lock_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_data<T>(&self, f: impl FnOnce(&MonitorData) -> T) -> T {
        let data = self
            .inner
            .data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&data)
    }

    fn write_data<T>(&self, f: impl FnOnce(&mut MonitorData) -> T) -> T {
        let mut data = self
            .inner
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut data)
    }
}

/// The loop holds only a weak reference so dropping every `Monitor` handle
/// ends it.
fn spawn_refresh_loop(inner: Weak<MonitorInner>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        // An interval past the clock's range leaves only the inline refresh.
        let Some(first_tick) = tokio::time::Instant::now().checked_add(period) else {
            return;
        };
        let mut interval = tokio::time::interval_at(first_tick, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(inner) = inner.upgrade() else {
                break;
            };
            refresh_inner(&inner).await;
        }
    })
}

async fn refresh_inner(inner: &MonitorInner) {
    let (prev_apps, prev_servers) = {
        let data = inner.data.read().unwrap_or_else(|p| p.into_inner());
        (data.apps.clone(), data.servers.clone())
    };

    let (apps, servers, stats) = tokio::join!(
        inner.source.running_apps(),
        inner.source.mcp_servers(),
        inner.source.system_stats(&prev_apps, &prev_servers),
    );

    let apps = apps.unwrap_or_else(|e| {
        tracing::error!(error = %e, "error scanning running apps");
        Vec::new()
    });
    let mut servers = servers.unwrap_or_else(|e| {
        tracing::error!(error = %e, "error scanning MCP servers");
        inner.source.fallback_servers()
    });
    servers.truncate(inner.settings.max_servers);

    let mut data = inner.data.write().unwrap_or_else(|p| p.into_inner());
    data.apps = apps;
    data.servers = servers;
    match stats {
        Ok(stats) => data.stats = stats,
        Err(e) => tracing::error!(error = %e, "error getting system stats"),
    }
    data.refreshed_at = Some(chrono::Local::now());
}

async fn rescan_servers(inner: &MonitorInner) {
    let mut servers = inner.source.mcp_servers().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "error rescanning MCP servers");
        inner.source.fallback_servers()
    });
    servers.truncate(inner.settings.max_servers);
    let mut data = inner.data.write().unwrap_or_else(|p| p.into_inner());
    data.servers = servers;
}

#[cfg(test)]
#[path = "tests/monitor_tests.rs"]
mod tests;

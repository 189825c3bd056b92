//! Data sources feeding the monitor.
//!
//! `SimulatedSource` fabricates every number: there is no process or port
//! inspection behind it. Values are redrawn on each call with no continuity
//! between ticks.

use crate::monitor::types::{
    AppKind, AppStatus, McpEndpoint, McpServer, RunningApp, ServerKind, ServerStatus, SystemStats,
};
use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::sync::{Mutex, OnceLock};

/// Producer of the three dashboard datasets.
#[async_trait]
pub trait MonitorSource: Send + Sync {
    async fn running_apps(&self) -> Result<Vec<RunningApp>>;

    async fn mcp_servers(&self) -> Result<Vec<McpServer>>;

    /// Aggregates, computed against the snapshot current when the refresh began.
    async fn system_stats(&self, apps: &[RunningApp], servers: &[McpServer])
        -> Result<SystemStats>;

    /// Shown when `mcp_servers` fails.
    fn fallback_servers(&self) -> Vec<McpServer> {
        vec![
            offline_server("mcp-filesystem", "File System MCP", ServerKind::Filesystem),
            offline_server("mcp-database", "Database MCP", ServerKind::Database),
        ]
    }
}

fn offline_server(id: &str, name: &str, kind: ServerKind) -> McpServer {
    McpServer {
        id: id.to_string(),
        name: name.to_string(),
        status: ServerStatus::Offline,
        last_active: "unknown".to_string(),
        kind,
        port: None,
        pid: None,
        endpoint: None,
        response_time_ms: None,
    }
}

/// Built-in MCP endpoint table.
pub fn default_endpoints() -> Vec<McpEndpoint> {
    vec![
        McpEndpoint::new("File System MCP", "http://localhost:3001/mcp", ServerKind::Filesystem),
        McpEndpoint::new("Database MCP", "http://localhost:3002/mcp", ServerKind::Database),
        McpEndpoint::new("GitHub MCP", "http://localhost:3003/mcp", ServerKind::Api),
        McpEndpoint::new("Terminal MCP", "http://localhost:3004/mcp", ServerKind::Tool),
    ]
}

/// First `:<digits>` in the URL, or 80.
pub fn port_from_endpoint(url: &str) -> u16 {
    static PORT_RE: OnceLock<Regex> = OnceLock::new();
    let re = PORT_RE.get_or_init(|| Regex::new(r":(\d+)").expect("static regex"));
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(80)
}

const UPTIME_LABELS: [&str; 10] = [
    "2h 34m", "45m 12s", "1d 3h", "5h 18m", "23m 41s", "12h 5m", "3d 2h", "8h 42m", "1h 17m",
    "4d 12h",
];

const LAST_ACTIVE_LABELS: [&str; 10] = [
    "now", "2m ago", "5m ago", "15m ago", "1h ago", "3h ago", "12h ago", "1d ago", "2d ago",
    "unknown",
];

/// Fixed part of an app template; the rest is drawn per tick.
struct AppTemplate {
    id: &'static str,
    name: &'static str,
    port: u16,
    kind: AppKind,
    command: &'static str,
    /// Probability of `Active`; otherwise `fallback`.
    active_probability: f64,
    fallback: AppStatus,
    memory_mb: (u64, u64),
    cpu_percent: (f64, f64),
    response_ms: (u64, u64),
}

const APP_TEMPLATES: [AppTemplate; 5] = [
    AppTemplate {
        id: "vscode-server",
        name: "VS Code Server",
        port: 8080,
        kind: AppKind::Web,
        command: "code-server --bind-addr 0.0.0.0:8080",
        active_probability: 1.0,
        fallback: AppStatus::Active,
        memory_mb: (150, 350),
        cpu_percent: (5.0, 20.0),
        response_ms: (50, 150),
    },
    AppTemplate {
        id: "react-dev-server",
        name: "React Dev Server",
        port: 3000,
        kind: AppKind::Web,
        command: "npm start",
        active_probability: 0.7,
        fallback: AppStatus::Idle,
        memory_mb: (80, 230),
        cpu_percent: (2.0, 27.0),
        response_ms: (100, 300),
    },
    AppTemplate {
        id: "postgres-server",
        name: "PostgreSQL",
        port: 5432,
        kind: AppKind::Database,
        command: "postgres -D /usr/local/var/postgres",
        active_probability: 0.8,
        fallback: AppStatus::Error,
        memory_mb: (200, 500),
        cpu_percent: (1.0, 11.0),
        response_ms: (10, 60),
    },
    AppTemplate {
        id: "api-server",
        name: "Node.js API",
        port: 4000,
        kind: AppKind::Api,
        command: "node server.js",
        active_probability: 0.6,
        fallback: AppStatus::Idle,
        memory_mb: (60, 180),
        cpu_percent: (3.0, 23.0),
        response_ms: (75, 225),
    },
    AppTemplate {
        id: "redis-server",
        name: "Redis Cache",
        port: 6379,
        kind: AppKind::Database,
        command: "redis-server",
        active_probability: 1.0,
        fallback: AppStatus::Active,
        memory_mb: (40, 120),
        cpu_percent: (0.5, 5.5),
        response_ms: (5, 25),
    },
];

/// Total memory reported by the simulator, in MB.
pub const SIMULATED_TOTAL_MEMORY_MB: u64 = 16_384;

/// Random dashboard data.
pub struct SimulatedSource {
    rng: Mutex<StdRng>,
    endpoints: Vec<McpEndpoint>,
}

impl SimulatedSource {
    pub fn new(endpoints: Vec<McpEndpoint>) -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            endpoints,
        }
    }

    /// Deterministic source for tests.
    pub fn seeded(seed: u64, endpoints: Vec<McpEndpoint>) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            endpoints,
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    fn generate_app(rng: &mut StdRng, template: &AppTemplate) -> RunningApp {
        let status = if rng.gen_bool(template.active_probability) {
            AppStatus::Active
        } else {
            template.fallback
        };
        RunningApp {
            id: template.id.to_string(),
            name: template.name.to_string(),
            port: template.port,
            pid: rng.gen_range(1000..11000),
            kind: template.kind,
            status,
            uptime: pick(rng, &UPTIME_LABELS),
            memory_mb: rng.gen_range(template.memory_mb.0..template.memory_mb.1),
            cpu_percent: rng.gen_range(template.cpu_percent.0..template.cpu_percent.1),
            command: template.command.to_string(),
            response_time_ms: rng.gen_range(template.response_ms.0..template.response_ms.1),
        }
    }

    fn generate_server(rng: &mut StdRng, endpoint: &McpEndpoint) -> McpServer {
        let online = rng.gen_bool(0.4);
        let (status, last_active, response_time_ms) = if online {
            (ServerStatus::Online, "now".to_string(), Some(rng.gen_range(5..120)))
        } else {
            let status = if rng.gen_bool(0.5) {
                ServerStatus::Offline
            } else {
                ServerStatus::Error
            };
            (status, pick(rng, &LAST_ACTIVE_LABELS), None)
        };
        McpServer {
            id: endpoint.server_id(),
            name: endpoint.name.clone(),
            status,
            last_active,
            kind: endpoint.kind,
            port: Some(port_from_endpoint(&endpoint.endpoint)),
            pid: None,
            endpoint: Some(endpoint.endpoint.clone()),
            response_time_ms,
        }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new(default_endpoints())
    }
}

fn pick(rng: &mut StdRng, labels: &[&str]) -> String {
    labels.choose(rng).copied().unwrap_or("unknown").to_string()
}

#[async_trait]
impl MonitorSource for SimulatedSource {
    /// Three to five apps, always a prefix of the template table.
    async fn running_apps(&self) -> Result<Vec<RunningApp>> {
        Ok(self.with_rng(|rng| {
            let count = rng.gen_range(3..=APP_TEMPLATES.len());
            APP_TEMPLATES[..count]
                .iter()
                .map(|template| Self::generate_app(rng, template))
                .collect()
        }))
    }

    async fn mcp_servers(&self) -> Result<Vec<McpServer>> {
        Ok(self.with_rng(|rng| {
            self.endpoints
                .iter()
                .map(|endpoint| Self::generate_server(rng, endpoint))
                .collect()
        }))
    }

    async fn system_stats(
        &self,
        apps: &[RunningApp],
        servers: &[McpServer],
    ) -> Result<SystemStats> {
        let online = servers
            .iter()
            .filter(|s| s.status == ServerStatus::Online)
            .count();
        Ok(self.with_rng(|rng| {
            let used_fraction = 0.4 + rng.gen::<f64>() * 0.3;
            SystemStats {
                total_memory_mb: SIMULATED_TOTAL_MEMORY_MB,
                used_memory_mb: (SIMULATED_TOTAL_MEMORY_MB as f64 * used_fraction) as u64,
                cpu_percent: rng.gen_range(10..50),
                active_connections: apps.len() + online,
            }
        }))
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;

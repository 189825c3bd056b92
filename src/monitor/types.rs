//! Dashboard records produced by the monitor.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    Web,
    Api,
    Database,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    Active,
    Idle,
    Error,
}

impl AppStatus {
    pub fn label(self) -> &'static str {
        match self {
            AppStatus::Active => "active",
            AppStatus::Idle => "idle",
            AppStatus::Error => "error",
        }
    }
}

/// A locally running development service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningApp {
    pub id: String,
    pub name: String,
    pub port: u16,
    pub pid: u32,
    pub kind: AppKind,
    pub status: AppStatus,
    pub uptime: String,
    pub memory_mb: u64,
    pub cpu_percent: f64,
    pub command: String,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
    Reconnecting,
    Error,
}

impl ServerStatus {
    pub fn label(self) -> &'static str {
        match self {
            ServerStatus::Online => "online",
            ServerStatus::Offline => "offline",
            ServerStatus::Reconnecting => "reconnecting",
            ServerStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Filesystem,
    Database,
    Api,
    Tool,
    Custom,
}

/// An MCP server entry on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpServer {
    pub id: String,
    pub name: String,
    pub status: ServerStatus,
    pub last_active: String,
    pub kind: ServerKind,
    pub port: Option<u16>,
    pub pid: Option<u32>,
    pub endpoint: Option<String>,
    pub response_time_ms: Option<u64>,
}

/// Aggregate numbers shown in the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub total_memory_mb: u64,
    pub used_memory_mb: u64,
    pub cpu_percent: u32,
    pub active_connections: usize,
}

/// An MCP endpoint the monitor reports on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpEndpoint {
    pub name: String,
    pub endpoint: String,
    pub kind: ServerKind,
}

impl McpEndpoint {
    pub fn new(name: &str, endpoint: &str, kind: ServerKind) -> Self {
        Self {
            name: name.to_string(),
            endpoint: endpoint.to_string(),
            kind,
        }
    }

    /// Stable id derived from the name: `mcp-` plus the kebab-cased name.
    pub fn server_id(&self) -> String {
        let slug = self
            .name
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-");
        format!("mcp-{}", slug)
    }
}

/// Everything the dashboard shows, captured at one instant.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorSnapshot {
    pub running_apps: Vec<RunningApp>,
    pub mcp_servers: Vec<McpServer>,
    pub system_stats: SystemStats,
    pub refreshed_at: Option<chrono::DateTime<chrono::Local>>,
}

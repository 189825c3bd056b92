use crate::monitor::{McpEndpoint, MonitorSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `backend.address`.
pub const BACKEND_ENV: &str = "SESSION_DECK_BACKEND";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the backend command service listens and how to reach it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendSettings {
    #[serde(default = "default_backend_address")]
    pub address: String,
    /// Connection attempts before giving up. Default: 5
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
    /// Upper bound for a single RPC, enforced by the transport. Default: 120
    #[serde(default = "default_call_deadline_secs")]
    pub call_deadline_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            address: default_backend_address(),
            connect_attempts: default_connect_attempts(),
            call_deadline_secs: default_call_deadline_secs(),
        }
    }
}

impl BackendSettings {
    pub fn call_deadline(&self) -> Duration {
        Duration::from_secs(self.call_deadline_secs)
    }
}

fn default_backend_address() -> String {
    "127.0.0.1:7420".to_string()
}

fn default_connect_attempts() -> u32 {
    5
}

fn default_call_deadline_secs() -> u64 {
    120
}

/// Client-side budgets for long-running backend commands, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_launch_ms")]
    pub launch_ms: u64,
    #[serde(default = "default_launch_with_spoof_ms")]
    pub launch_with_spoof_ms: u64,
    #[serde(default = "default_spoof_mac_ms")]
    pub spoof_mac_ms: u64,
    #[serde(default = "default_delete_ms")]
    pub delete_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            launch_ms: default_launch_ms(),
            launch_with_spoof_ms: default_launch_with_spoof_ms(),
            spoof_mac_ms: default_spoof_mac_ms(),
            delete_ms: default_delete_ms(),
        }
    }
}

impl TimeoutConfig {
    /// Budget for a launch; spoofing the MAC first takes much longer.
    pub fn launch(&self, spoof_mac: bool) -> Duration {
        if spoof_mac {
            Duration::from_millis(self.launch_with_spoof_ms)
        } else {
            Duration::from_millis(self.launch_ms)
        }
    }

    pub fn spoof_mac(&self) -> Duration {
        Duration::from_millis(self.spoof_mac_ms)
    }

    pub fn delete(&self) -> Duration {
        Duration::from_millis(self.delete_ms)
    }
}

fn default_launch_ms() -> u64 {
    30_000
}

fn default_launch_with_spoof_ms() -> u64 {
    60_000
}

fn default_spoof_mac_ms() -> u64 {
    30_000
}

fn default_delete_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_servers")]
    pub max_servers: usize,
    #[serde(default = "default_rescan_delay_ms")]
    pub rescan_delay_ms: u64,
    /// Replaces the built-in MCP endpoint table when present.
    #[serde(default)]
    pub endpoints: Option<Vec<McpEndpoint>>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_servers: default_max_servers(),
            rescan_delay_ms: default_rescan_delay_ms(),
            endpoints: None,
        }
    }
}

impl MonitorConfig {
    pub fn settings(&self) -> MonitorSettings {
        MonitorSettings {
            interval: Duration::from_millis(self.interval_ms),
            max_servers: self.max_servers,
            rescan_delay: Duration::from_millis(self.rescan_delay_ms),
        }
    }
}

fn default_interval_ms() -> u64 {
    3_000
}

fn default_max_servers() -> usize {
    8
}

fn default_rescan_delay_ms() -> u64 {
    2_000
}

/// Display timings and form rules for the view layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
    #[serde(default = "default_create_status_secs")]
    pub create_status_secs: u64,
    #[serde(default = "default_launch_status_secs")]
    pub launch_status_secs: u64,
    #[serde(default = "default_delete_status_secs")]
    pub delete_status_secs: u64,
    #[serde(default = "default_require_launcher")]
    pub require_launcher: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_secs: default_notification_secs(),
            create_status_secs: default_create_status_secs(),
            launch_status_secs: default_launch_status_secs(),
            delete_status_secs: default_delete_status_secs(),
            require_launcher: default_require_launcher(),
        }
    }
}

fn default_notification_secs() -> u64 {
    5
}

fn default_create_status_secs() -> u64 {
    3
}

fn default_launch_status_secs() -> u64 {
    5
}

fn default_delete_status_secs() -> u64 {
    3
}

fn default_require_launcher() -> bool {
    true
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file as YAML: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise the defaults, then applies
    /// environment overrides.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(address) = std::env::var(BACKEND_ENV) {
            if !address.trim().is_empty() {
                self.backend.address = address.trim().to_string();
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.address.trim().is_empty() {
            anyhow::bail!("backend.address must not be empty");
        }
        if self.backend.connect_attempts == 0 {
            anyhow::bail!("backend.connect_attempts must be at least 1");
        }

        for (name, value) in [
            ("timeouts.launch_ms", self.timeouts.launch_ms),
            ("timeouts.launch_with_spoof_ms", self.timeouts.launch_with_spoof_ms),
            ("timeouts.spoof_mac_ms", self.timeouts.spoof_mac_ms),
            ("timeouts.delete_ms", self.timeouts.delete_ms),
            ("monitor.interval_ms", self.monitor.interval_ms),
        ] {
            check_range(name, value, 1, MAX_DURATION_SECS * 1_000)?;
        }
        check_range(
            "monitor.rescan_delay_ms",
            self.monitor.rescan_delay_ms,
            0,
            MAX_DURATION_SECS * 1_000,
        )?;

        check_range(
            "backend.call_deadline_secs",
            self.backend.call_deadline_secs,
            1,
            MAX_DURATION_SECS,
        )?;
        for (name, value) in [
            ("ui.notification_secs", self.ui.notification_secs),
            ("ui.create_status_secs", self.ui.create_status_secs),
            ("ui.launch_status_secs", self.ui.launch_status_secs),
            ("ui.delete_status_secs", self.ui.delete_status_secs),
        ] {
            check_range(name, value, 0, MAX_DURATION_SECS)?;
        }

        // The transport deadline must outlive the longest client budget.
        let longest_budget = [
            self.timeouts.launch(false),
            self.timeouts.launch(true),
            self.timeouts.spoof_mac(),
            self.timeouts.delete(),
        ]
        .into_iter()
        .max()
        .unwrap_or_default();
        if self.backend.call_deadline() < longest_budget {
            anyhow::bail!(
                "backend.call_deadline_secs ({}s) must be at least the longest timeout ({}ms)",
                self.backend.call_deadline_secs,
                longest_budget.as_millis()
            );
        }
        Ok(())
    }
}

/// Upper bound for any configured duration: one day.
const MAX_DURATION_SECS: u64 = 86_400;

fn check_range(name: &str, value: u64, min: u64, max: u64) -> Result<()> {
    if value < min || value > max {
        anyhow::bail!("{} must be between {} and {} (got {})", name, min, max, value);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/client_config_tests.rs"]
mod tests;

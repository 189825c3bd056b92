//! Dashboard tab: monitor controls that report back through notifications.

use crate::monitor::{Monitor, MonitorSnapshot};
use crate::view::notification::NotificationCenter;
use std::time::{Duration, Instant};

pub struct MonitorPanel {
    monitor: Monitor,
    pub notifications: NotificationCenter,
}

impl MonitorPanel {
    pub fn new(monitor: Monitor, notification_duration: Duration) -> Self {
        Self {
            monitor,
            notifications: NotificationCenter::new(notification_duration),
        }
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.monitor.snapshot()
    }

    pub fn stop_app(&mut self, app_id: &str) -> bool {
        let stopped = self.monitor.stop_app(app_id);
        if stopped {
            self.notifications.success("Application stopped successfully");
        } else {
            self.notifications.error("Failed to stop application");
        }
        stopped
    }

    pub fn restart_app(&mut self, app_id: &str) -> bool {
        let restarted = self.monitor.restart_app(app_id);
        if restarted {
            self.notifications.success("Application restart initiated");
        } else {
            self.notifications.error("Failed to restart application");
        }
        restarted
    }

    pub async fn refresh_app(&mut self) {
        self.notifications.success("Refreshing application status...");
        self.monitor.refresh().await;
    }

    pub fn stop_server(&mut self, server_id: &str) -> bool {
        let stopped = self.monitor.stop_server(server_id);
        if stopped {
            self.notifications.success("MCP Server stopped successfully");
        } else {
            self.notifications.error("Failed to stop MCP server");
        }
        stopped
    }

    pub fn restart_server(&mut self, server_id: &str) -> bool {
        let restarted = self.monitor.restart_server(server_id);
        if restarted {
            self.notifications.success("MCP Server restart initiated");
        } else {
            self.notifications.error("Failed to restart MCP server");
        }
        restarted
    }

    pub async fn refresh_server(&mut self) {
        self.notifications.success("Refreshing MCP server status...");
        self.monitor.refresh().await;
    }

    pub fn tick(&mut self, now: Instant) {
        self.notifications.expire(now);
    }
}

#[cfg(test)]
#[path = "tests/monitor_panel_tests.rs"]
mod tests;

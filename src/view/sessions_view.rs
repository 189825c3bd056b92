//! Session list screen: sessions, archives, launcher apps and the settings
//! helpers, with the progress line and notifications they drive.

use crate::client::{ClientError, Session, SessionClient};
use crate::config::UiConfig;
use crate::rpc::{ArchiveInfo, CommandError, LauncherApp};
use crate::view::action_status::ActionStatus;
use crate::view::notification::NotificationCenter;
use crate::view::session_form::{FormError, SessionForm};
use crate::view::Tab;
use std::time::{Duration, Instant};

/// Confirmation state for pending destructive actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationState {
    DeleteSession {
        session_id: String,
        session_name: String,
    },
}

const SUDO_REQUIRED: &str =
    "MAC spoofing requires admin access. Please check the settings tab for setup instructions.";

/// User-facing message for a failed launch.
pub fn launch_failure_message(err: &ClientError) -> String {
    match err {
        ClientError::TimedOut { .. } => {
            "Operation timed out. Please check your network connection and permissions."
                .to_string()
        }
        ClientError::Backend(CommandError::SudoRequired { .. }) => SUDO_REQUIRED.to_string(),
        ClientError::Backend(CommandError::SessionDirectoryNotFound { .. }) => {
            "Session directory not found. Please try creating the session again.".to_string()
        }
        other => format!("Failed to launch session: {}", other),
    }
}

pub struct SessionsView {
    client: SessionClient,
    ui: UiConfig,
    pub tab: Tab,
    pub sessions: Vec<Session>,
    pub archives: Vec<ArchiveInfo>,
    pub launcher_apps: Vec<LauncherApp>,
    pub form: SessionForm,
    /// Spoof the MAC address before launching.
    pub spoof_mac: bool,
    pub connect_vpn: bool,
    pub confirmation_pending: Option<ConfirmationState>,
    pub status: ActionStatus,
    pub notifications: NotificationCenter,
    /// Last address produced by `random_mac` or `spoof_mac`.
    pub last_mac_result: Option<String>,
}

impl SessionsView {
    pub fn new(client: SessionClient, ui: UiConfig) -> Self {
        let notifications = NotificationCenter::new(Duration::from_secs(ui.notification_secs));
        Self {
            client,
            ui,
            tab: Tab::Sessions,
            sessions: Vec::new(),
            archives: Vec::new(),
            launcher_apps: Vec::new(),
            form: SessionForm::default(),
            spoof_mac: false,
            connect_vpn: false,
            confirmation_pending: None,
            status: ActionStatus::default(),
            notifications,
            last_mac_result: None,
        }
    }

    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// Reloads the session list; empty when the backend is unreachable.
    pub async fn load_sessions(&mut self) {
        let sessions = self.client.get_sessions().await;
        tracing::debug!(count = sessions.len(), "loaded sessions");
        // Projects attached at creation survive a reload within this view.
        let previous = std::mem::take(&mut self.sessions);
        self.sessions = sessions
            .into_iter()
            .map(|mut session| {
                if let Some(old) = previous.iter().find(|p| p.id == session.id) {
                    if session.projects.is_empty() {
                        session.projects = old.projects.clone();
                    }
                }
                session
            })
            .collect();
    }

    pub async fn load_launcher_apps(&mut self) {
        self.launcher_apps = self.client.list_launcher_apps().await;
    }

    pub async fn load_archives(&mut self) {
        self.archives = self.client.list_archives().await;
    }

    /// Shows the form and loads the launcher choices.
    pub async fn open_form(&mut self) {
        self.form.visible = true;
        self.load_launcher_apps().await;
    }

    pub fn close_form(&mut self) {
        self.form.visible = false;
    }

    /// Validates and submits the form. Returns true when a session was created.
    pub async fn submit_form(&mut self) -> bool {
        let valid = match self.form.validate(self.ui.require_launcher) {
            Ok(valid) => valid,
            Err(e) => {
                self.notifications.error(e.to_string());
                return false;
            }
        };
        let Some(launcher) = valid
            .launcher
            .clone()
            .or_else(|| self.launcher_apps.first().cloned())
        else {
            self.notifications.error(FormError::MissingLauncher.to_string());
            return false;
        };

        let delay = Duration::from_secs(self.ui.create_status_secs);
        self.status.begin("Creating new session...");
        match self
            .client
            .save_session(&valid.name, valid.projects, launcher)
            .await
        {
            Ok(session) => {
                self.notifications.success("Session created successfully!");
                self.status.succeed("Session created successfully!", delay);
                self.form.reset();
                self.form.visible = false;
                // Keep the projects the backend does not store.
                self.sessions.retain(|s| s.id != session.id);
                self.sessions.push(session);
                self.load_sessions().await;
                true
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to create session: {}", e));
                self.status.fail("Failed to create session", delay);
                false
            }
        }
    }

    /// Launches a listed session, opening its projects afterwards.
    pub async fn launch(&mut self, session_id: &str) -> bool {
        let Some(session) = self.session(session_id).cloned() else {
            self.notifications
                .error(format!("Session not found: {}", session_id));
            return false;
        };
        let delay = Duration::from_secs(self.ui.launch_status_secs);

        self.status.begin("Initializing session launch...");
        if self.spoof_mac {
            self.status
                .step("Spoofing MAC address... (this may take up to 60 seconds)");
        } else {
            self.status.step("Launching session...");
        }

        match self
            .client
            .launch_session(&session, self.spoof_mac, self.connect_vpn)
            .await
        {
            Ok(_) => {
                self.notifications
                    .success(format!("Session launched: {}", session.name));
                if session.projects.is_empty() {
                    self.status.succeed("Session launched successfully!", delay);
                } else {
                    self.status.step("Opening projects...");
                    if self.client.open_projects(&session.projects).await {
                        self.status.succeed("Projects opened successfully!", delay);
                    } else {
                        self.status.fail("Failed to open projects", delay);
                    }
                }
                true
            }
            Err(e) => {
                self.status.fail("Launch failed!", delay);
                self.notifications.error(launch_failure_message(&e));
                false
            }
        }
    }

    /// First step of deletion. Nothing is sent to the backend.
    pub fn request_delete(&mut self, session_id: &str) {
        let session_name = self
            .session(session_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| session_id.to_string());
        self.confirmation_pending = Some(ConfirmationState::DeleteSession {
            session_id: session_id.to_string(),
            session_name,
        });
    }

    pub fn cancel_delete(&mut self) {
        tracing::debug!("delete cancelled");
        self.confirmation_pending = None;
    }

    /// Second step of deletion. Returns true when the session was deleted.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(ConfirmationState::DeleteSession {
            session_id,
            session_name,
        }) = self.confirmation_pending.take()
        else {
            return false;
        };
        let delay = Duration::from_secs(self.ui.delete_status_secs);

        self.status
            .begin(format!("Deleting session: {}...", session_name));
        match self.client.delete_session_by_id(&session_id).await {
            Ok(()) => {
                self.notifications
                    .success(format!("Session \"{}\" deleted successfully!", session_name));
                self.status.succeed("Session deleted successfully!", delay);
                self.sessions.retain(|s| s.id != session_id);
                self.load_sessions().await;
                true
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to delete session: {}", e));
                self.status.fail("Failed to delete session", delay);
                false
            }
        }
    }

    pub async fn spoof_mac_address(&mut self, interface: Option<String>) -> bool {
        match self.client.spoof_mac(interface).await {
            Ok(message) => {
                self.notifications.success(message.clone());
                self.last_mac_result = Some(message);
                true
            }
            Err(e) => {
                let message = match e.command_error() {
                    Some(CommandError::SudoRequired { .. }) => SUDO_REQUIRED.to_string(),
                    _ => format!("Failed to spoof MAC address: {}", e),
                };
                self.notifications.error(message);
                false
            }
        }
    }

    pub async fn random_mac(&mut self) -> Option<String> {
        match self.client.random_mac().await {
            Ok(mac) => {
                self.last_mac_result = Some(mac.clone());
                Some(mac)
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to generate MAC address: {}", e));
                None
            }
        }
    }

    pub async fn archive_session(&mut self, session_id: &str) -> bool {
        match self.client.archive_session(session_id).await {
            Ok(message) => {
                self.notifications.success(message);
                self.load_sessions().await;
                self.load_archives().await;
                true
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to archive session: {}", e));
                false
            }
        }
    }

    pub async fn restore_archive(&mut self, archive: &str, new_name: Option<&str>) -> bool {
        match self.client.restore_archive(archive, new_name).await {
            Ok(message) => {
                self.notifications.success(message);
                self.load_sessions().await;
                self.load_archives().await;
                true
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to restore archive: {}", e));
                false
            }
        }
    }

    pub async fn delete_archive(&mut self, archive: &str) -> bool {
        match self.client.delete_archive(archive).await {
            Ok(message) => {
                self.notifications.success(message);
                self.load_archives().await;
                true
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to delete archive: {}", e));
                false
            }
        }
    }

    /// Expires the progress line and the notification.
    pub fn tick(&mut self, now: Instant) {
        self.status.tick(now);
        self.notifications.expire(now);
    }
}

#[cfg(test)]
#[path = "tests/sessions_view_tests.rs"]
mod tests;

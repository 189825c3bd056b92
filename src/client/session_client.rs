//! One wrapper per backend command, with the failure policy the views rely on.
//!
//! Listing calls degrade to an empty list so a dead backend only empties the
//! screen. Everything that changes state propagates a [`ClientError`] so the
//! caller can tell the user what went wrong.

use crate::client::{ClientResult, CommandBackend, OperationHandle};
use crate::config::TimeoutConfig;
use crate::rpc::{ArchiveInfo, BackendConfig, LauncherApp, SessionInfo};
use serde::Serialize;
use std::sync::Arc;

/// Session as presented in the session list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub created_date: String,
    pub modified_date: String,
    /// Project paths to open after launch. The backend does not return
    /// them, so sessions loaded from a listing always start empty.
    pub projects: Vec<String>,
    pub launcher_app: LauncherApp,
}

impl From<SessionInfo> for Session {
    fn from(info: SessionInfo) -> Self {
        Self {
            id: info.name.clone(),
            name: info.name,
            created_date: info.created.clone(),
            modified_date: info.created,
            projects: Vec::new(),
            launcher_app: info.launcher_app,
        }
    }
}

/// Command client used by the views.
#[derive(Clone)]
pub struct SessionClient {
    backend: Arc<dyn CommandBackend>,
    timeouts: TimeoutConfig,
}

impl SessionClient {
    pub fn new(backend: Arc<dyn CommandBackend>, timeouts: TimeoutConfig) -> Self {
        Self { backend, timeouts }
    }

    pub async fn get_config(&self) -> ClientResult<BackendConfig> {
        self.backend.get_config().await.inspect_err(|e| {
            tracing::error!(error = %e, "error fetching config");
        })
    }

    pub async fn update_config(&self, config: BackendConfig) -> ClientResult<BackendConfig> {
        self.backend.update_config(config).await.inspect_err(|e| {
            tracing::error!(error = %e, "error updating config");
        })
    }

    /// Raw session records. Empty on failure.
    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        match self.backend.list_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(error = %e, "error listing sessions");
                Vec::new()
            }
        }
    }

    /// Archives. Empty on failure.
    pub async fn list_archives(&self) -> Vec<ArchiveInfo> {
        match self.backend.list_archives().await {
            Ok(archives) => archives,
            Err(e) => {
                tracing::warn!(error = %e, "error listing archives");
                Vec::new()
            }
        }
    }

    pub async fn create_session(
        &self,
        name: &str,
        launcher_app: LauncherApp,
    ) -> ClientResult<String> {
        self.backend
            .create_session(name.to_string(), launcher_app)
            .await
            .inspect_err(|e| tracing::error!(session = name, error = %e, "error creating session"))
    }

    /// Launches a session under the launch budget. Exceeding the budget aborts
    /// the call and yields `TimedOut`.
    pub async fn launch_session(
        &self,
        session: &Session,
        spoof_mac: bool,
        connect_vpn: bool,
    ) -> ClientResult<String> {
        tracing::debug!(session = %session.name, spoof_mac, connect_vpn, "launch_session called");
        let operation = if spoof_mac {
            "Session launch with MAC spoofing"
        } else {
            "Session launch"
        };

        let backend = self.backend.clone();
        let name = session.name.clone();
        let handle = OperationHandle::spawn(operation, async move {
            backend.launch_session(name, spoof_mac, connect_vpn).await
        });

        let result = handle.wait_timeout(self.timeouts.launch(spoof_mac)).await;
        match &result {
            Ok(message) => {
                tracing::debug!(session = %session.name, result = %message, "launch_session result")
            }
            Err(e) => {
                tracing::error!(session = %session.name, error = %e, "error launching session")
            }
        }
        result
    }

    pub async fn spoof_mac(&self, interface: Option<String>) -> ClientResult<String> {
        tracing::debug!(interface = ?interface, "spoof_mac called");
        let backend = self.backend.clone();
        let handle = OperationHandle::spawn("MAC address spoofing", async move {
            backend.spoof_mac(interface).await
        });

        handle
            .wait_timeout(self.timeouts.spoof_mac())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "error spoofing MAC address"))
    }

    pub async fn archive_session(&self, session: &str) -> ClientResult<String> {
        self.backend
            .archive_session(session.to_string())
            .await
            .inspect_err(|e| tracing::error!(session, error = %e, "error archiving session"))
    }

    pub async fn restore_archive(
        &self,
        archive: &str,
        new_session_name: Option<&str>,
    ) -> ClientResult<String> {
        self.backend
            .restore_archive(archive.to_string(), new_session_name.map(str::to_string))
            .await
            .inspect_err(|e| tracing::error!(archive, error = %e, "error restoring archive"))
    }

    pub async fn delete_session(&self, session: &str) -> ClientResult<String> {
        self.backend
            .delete_session(session.to_string())
            .await
            .inspect_err(|e| tracing::error!(session, error = %e, "error deleting session"))
    }

    pub async fn delete_archive(&self, archive: &str) -> ClientResult<String> {
        self.backend
            .delete_archive(archive.to_string())
            .await
            .inspect_err(|e| tracing::error!(archive, error = %e, "error deleting archive"))
    }

    pub async fn random_mac(&self) -> ClientResult<String> {
        self.backend
            .random_mac()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "error generating random MAC"))
    }

    /// Session view models. Empty on failure.
    pub async fn get_sessions(&self) -> Vec<Session> {
        match self.backend.list_sessions().await {
            Ok(sessions) => {
                tracing::debug!(count = sessions.len(), "get_sessions received records");
                sessions.into_iter().map(Session::from).collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "error fetching sessions");
                Vec::new()
            }
        }
    }

    /// Creates a session and returns its view model with `projects` attached.
    /// The backend only stores the name and launcher.
    pub async fn save_session(
        &self,
        name: &str,
        projects: Vec<String>,
        launcher_app: LauncherApp,
    ) -> ClientResult<Session> {
        self.create_session(name, launcher_app.clone()).await?;
        let now = chrono::Utc::now().to_rfc3339();
        Ok(Session {
            id: name.to_string(),
            name: name.to_string(),
            created_date: now.clone(),
            modified_date: now,
            projects,
            launcher_app,
        })
    }

    /// Deletes a session under the deletion budget.
    pub async fn delete_session_by_id(&self, id: &str) -> ClientResult<()> {
        tracing::debug!(session = id, "delete_session_by_id called");
        let backend = self.backend.clone();
        let session = id.to_string();
        let handle = OperationHandle::spawn("Session deletion", async move {
            backend.delete_session(session).await
        });

        match handle.wait_timeout(self.timeouts.delete()).await {
            Ok(message) => {
                tracing::debug!(session = id, result = %message, "delete_session_by_id result");
                Ok(())
            }
            Err(e) => {
                tracing::error!(session = id, error = %e, "error deleting session");
                Err(e)
            }
        }
    }

    /// Opens project paths in the launcher. Returns false on failure.
    pub async fn open_projects(&self, projects: &[String]) -> bool {
        match self.backend.open_projects(projects.to_vec()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "error opening projects");
                false
            }
        }
    }

    /// Launcher applications. Empty on failure.
    pub async fn list_launcher_apps(&self) -> Vec<LauncherApp> {
        match self.backend.list_launcher_apps().await {
            Ok(apps) => apps,
            Err(e) => {
                tracing::warn!(error = %e, "error listing launcher apps");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_client_tests.rs"]
mod tests;

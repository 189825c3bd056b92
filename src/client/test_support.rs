//! In-memory `CommandBackend` for client and view tests.

use crate::client::{ClientError, ClientResult, CommandBackend};
use crate::rpc::{ArchiveInfo, BackendConfig, CommandError, LauncherApp, SessionInfo};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn launcher() -> LauncherApp {
    LauncherApp {
        name: "Cursor".to_string(),
        exec_path: "/Applications/Cursor.app/Contents/MacOS/Cursor".to_string(),
        icon_path: None,
    }
}

pub fn session_info(name: &str) -> SessionInfo {
    SessionInfo {
        name: name.to_string(),
        path: format!("/profiles/{}", name),
        created: "2024-05-01".to_string(),
        launcher_app: launcher(),
    }
}

/// Scripted backend. Every call is recorded by command name.
#[derive(Default)]
pub struct FakeBackend {
    pub sessions: Mutex<Vec<SessionInfo>>,
    pub archives: Mutex<Vec<ArchiveInfo>>,
    pub apps: Mutex<Vec<LauncherApp>>,
    pub calls: Mutex<Vec<String>>,
    /// When set, every command fails with a transport error.
    pub offline: AtomicBool,
    /// Error returned by `launch_session` instead of succeeding.
    pub launch_error: Mutex<Option<CommandError>>,
    /// Delay before `launch_session` and `delete_session` answer.
    pub delay: Mutex<Duration>,
    /// Set once a delayed call ran to completion.
    pub slow_call_completed: AtomicBool,
    pub opened_projects: Mutex<Vec<Vec<String>>>,
}

impl FakeBackend {
    pub fn with_sessions(names: &[&str]) -> Arc<Self> {
        let backend = Self::default();
        *backend.sessions.lock().unwrap() = names.iter().map(|n| session_info(n)).collect();
        *backend.apps.lock().unwrap() = vec![launcher()];
        Arc::new(backend)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, command: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == command)
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    fn record(&self, command: &str) -> ClientResult<()> {
        self.calls.lock().unwrap().push(command.to_string());
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Transport {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    async fn slow_step(&self) {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
            self.slow_call_completed.store(true, Ordering::SeqCst);
        }
    }
}

fn config() -> BackendConfig {
    BackendConfig {
        cursor_app: "/Applications/Cursor.app/Contents/MacOS/Cursor".to_string(),
        profile_base: "/profiles".to_string(),
        archive_base: "/archives".to_string(),
        workspace_base: "/projects".to_string(),
        network_interface: "en0".to_string(),
    }
}

#[async_trait]
impl CommandBackend for FakeBackend {
    async fn get_config(&self) -> ClientResult<BackendConfig> {
        self.record("get_config")?;
        Ok(config())
    }

    async fn update_config(&self, config: BackendConfig) -> ClientResult<BackendConfig> {
        self.record("update_config")?;
        Ok(config)
    }

    async fn list_sessions(&self) -> ClientResult<Vec<SessionInfo>> {
        self.record("list_sessions")?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn list_archives(&self) -> ClientResult<Vec<ArchiveInfo>> {
        self.record("list_archives")?;
        Ok(self.archives.lock().unwrap().clone())
    }

    async fn create_session(
        &self,
        name: String,
        launcher_app: LauncherApp,
    ) -> ClientResult<String> {
        self.record("create_session")?;
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.iter().any(|s| s.name == name) {
            return Err(CommandError::SessionExists { session: name }.into());
        }
        let mut info = session_info(&name);
        info.launcher_app = launcher_app;
        sessions.push(info);
        Ok(format!("Session '{}' created", name))
    }

    async fn launch_session(
        &self,
        session: String,
        _spoof_mac: bool,
        _connect_vpn: bool,
    ) -> ClientResult<String> {
        self.record("launch_session")?;
        self.slow_step().await;
        if let Some(err) = self.launch_error.lock().unwrap().clone() {
            return Err(err.into());
        }
        Ok(format!("Launched session '{}'", session))
    }

    async fn spoof_mac(&self, interface: Option<String>) -> ClientResult<String> {
        self.record("spoof_mac")?;
        let iface = interface.unwrap_or_else(|| "en0".to_string());
        Ok(format!("MAC address for {} changed to 02:11:22:33:44:55", iface))
    }

    async fn archive_session(&self, session: String) -> ClientResult<String> {
        self.record("archive_session")?;
        let exists = self.sessions.lock().unwrap().iter().any(|s| s.name == session);
        if !exists {
            return Err(CommandError::SessionNotFound { session }.into());
        }
        let name = format!("{}-20240501-120000", session);
        self.archives.lock().unwrap().push(ArchiveInfo {
            name: name.clone(),
            path: format!("/archives/{}", name),
            created: "2024-05-01".to_string(),
            original_session: session.clone(),
        });
        Ok(format!("Session '{}' archived to '{}'", session, name))
    }

    async fn restore_archive(
        &self,
        archive: String,
        new_session_name: Option<String>,
    ) -> ClientResult<String> {
        self.record("restore_archive")?;
        let original = self
            .archives
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.name == archive)
            .map(|a| a.original_session.clone());
        let Some(original) = original else {
            return Err(CommandError::ArchiveNotFound { archive }.into());
        };
        let target = new_session_name.unwrap_or(original);
        self.sessions.lock().unwrap().push(session_info(&target));
        Ok(format!("Archive '{}' restored to session '{}'", archive, target))
    }

    async fn delete_session(&self, session: String) -> ClientResult<String> {
        self.record("delete_session")?;
        self.slow_step().await;
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.name != session);
        if sessions.len() == before {
            return Err(CommandError::SessionNotFound { session }.into());
        }
        Ok(format!("Session '{}' deleted", session))
    }

    async fn delete_archive(&self, archive: String) -> ClientResult<String> {
        self.record("delete_archive")?;
        let mut archives = self.archives.lock().unwrap();
        let before = archives.len();
        archives.retain(|a| a.name != archive);
        if archives.len() == before {
            return Err(CommandError::ArchiveNotFound { archive }.into());
        }
        Ok(format!("Archive '{}' deleted", archive))
    }

    async fn random_mac(&self) -> ClientResult<String> {
        self.record("random_mac")?;
        Ok("02:de:ad:be:ef:01".to_string())
    }

    async fn open_projects(&self, projects: Vec<String>) -> ClientResult<()> {
        self.record("open_projects")?;
        self.opened_projects.lock().unwrap().push(projects);
        Ok(())
    }

    async fn list_launcher_apps(&self) -> ClientResult<Vec<LauncherApp>> {
        self.record("list_launcher_apps")?;
        Ok(self.apps.lock().unwrap().clone())
    }
}

//! Command service exposed by the session backend.

use crate::rpc::{ArchiveInfo, BackendConfig, CommandResult, LauncherApp, SessionInfo};

/// Backend commands, one per user-facing action.
#[tarpc::service]
pub trait CommandService {
    /// Current backend settings.
    async fn get_config() -> CommandResult<BackendConfig>;

    /// Replace backend settings. Returns the stored record.
    async fn update_config(config: BackendConfig) -> CommandResult<BackendConfig>;

    async fn list_sessions() -> CommandResult<Vec<SessionInfo>>;

    async fn list_archives() -> CommandResult<Vec<ArchiveInfo>>;

    /// Create a session profile bound to a launcher application.
    async fn create_session(name: String, launcher_app: LauncherApp) -> CommandResult<String>;

    /// Start the launcher for a session, optionally spoofing the MAC first.
    async fn launch_session(
        session: String,
        spoof_mac: bool,
        connect_vpn: bool,
    ) -> CommandResult<String>;

    /// Assign a random MAC to `interface` (backend default when `None`).
    async fn spoof_mac(interface: Option<String>) -> CommandResult<String>;

    async fn archive_session(session: String) -> CommandResult<String>;

    /// Restore an archive, under `new_session_name` or its original name.
    async fn restore_archive(
        archive: String,
        new_session_name: Option<String>,
    ) -> CommandResult<String>;

    async fn delete_session(session: String) -> CommandResult<String>;

    async fn delete_archive(archive: String) -> CommandResult<String>;

    /// A locally administered random MAC address, without applying it.
    async fn random_mac() -> CommandResult<String>;

    /// Open project paths in the launcher.
    async fn open_projects(projects: Vec<String>) -> CommandResult<()>;

    /// Launcher applications installed on the backend host.
    async fn list_launcher_apps() -> CommandResult<Vec<LauncherApp>>;
}

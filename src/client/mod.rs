//! Remote command client.
//!
//! - **Seam (`CommandBackend`)**: one async method per backend command, so the
//!   view layer can run against the real RPC backend or an in-memory fake.
//! - **Transport (`rpc_backend.rs`)**: tarpc over TCP with connect retry.
//! - **Timed calls (`operation.rs`)**: cancellable handles; an exceeded budget
//!   aborts the call instead of orphaning it.
//! - **Wrappers (`session_client.rs`)**: per-command failure policy and the
//!   `Session` view model.

pub mod operation;
pub mod rpc_backend;
pub mod session_client;

use crate::rpc::{ArchiveInfo, BackendConfig, CommandError, LauncherApp, SessionInfo};
use async_trait::async_trait;
use std::time::Duration;

pub use operation::OperationHandle;
pub use rpc_backend::RpcBackend;
pub use session_client::{Session, SessionClient};

/// Closed set of failure kinds the view layer switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Backend,
    Transport,
    TimedOut,
    Cancelled,
}

/// Errors produced by the command client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The backend ran the command and reported a failure
    Backend(CommandError),
    /// The call never produced a backend answer
    Transport { message: String },
    /// The client-side budget ran out; the call was aborted
    TimedOut { operation: String, after: Duration },
    /// The call was cancelled before it finished
    Cancelled { operation: String },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Backend(_) => ErrorKind::Backend,
            ClientError::Transport { .. } => ErrorKind::Transport,
            ClientError::TimedOut { .. } => ErrorKind::TimedOut,
            ClientError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// The backend error, when the backend produced one.
    pub fn command_error(&self) -> Option<&CommandError> {
        match self {
            ClientError::Backend(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Backend(err) => write!(f, "{}", err),
            ClientError::Transport { message } => write!(f, "Backend unreachable: {}", message),
            ClientError::TimedOut { operation, after } => {
                write!(f, "{} timed out after {}ms", operation, after.as_millis())
            }
            ClientError::Cancelled { operation } => write!(f, "{} was cancelled", operation),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<CommandError> for ClientError {
    fn from(err: CommandError) -> Self {
        ClientError::Backend(err)
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// The backend command surface as seen by the client.
#[async_trait]
pub trait CommandBackend: Send + Sync {
    async fn get_config(&self) -> ClientResult<BackendConfig>;

    async fn update_config(&self, config: BackendConfig) -> ClientResult<BackendConfig>;

    async fn list_sessions(&self) -> ClientResult<Vec<SessionInfo>>;

    async fn list_archives(&self) -> ClientResult<Vec<ArchiveInfo>>;

    async fn create_session(&self, name: String, launcher_app: LauncherApp)
        -> ClientResult<String>;

    async fn launch_session(
        &self,
        session: String,
        spoof_mac: bool,
        connect_vpn: bool,
    ) -> ClientResult<String>;

    async fn spoof_mac(&self, interface: Option<String>) -> ClientResult<String>;

    async fn archive_session(&self, session: String) -> ClientResult<String>;

    async fn restore_archive(
        &self,
        archive: String,
        new_session_name: Option<String>,
    ) -> ClientResult<String>;

    async fn delete_session(&self, session: String) -> ClientResult<String>;

    async fn delete_archive(&self, archive: String) -> ClientResult<String>;

    async fn random_mac(&self) -> ClientResult<String>;

    async fn open_projects(&self, projects: Vec<String>) -> ClientResult<()>;

    async fn list_launcher_apps(&self) -> ClientResult<Vec<LauncherApp>>;
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/client_error_tests.rs"]
mod client_error_tests;

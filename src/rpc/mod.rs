//! Wire types and service definition for the backend command surface.
//!
//! The backend owns session directories, archives, process launch and MAC
//! address changes. This crate only talks to it through [`command_service`].

pub mod command_service;

use serde::{Deserialize, Serialize};

/// Backend settings record, as returned by `get_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub cursor_app: String,
    pub profile_base: String,
    pub archive_base: String,
    pub workspace_base: String,
    pub network_interface: String,
}

impl BackendConfig {
    /// Field names accepted by [`BackendConfig::set_field`].
    pub const FIELDS: [&'static str; 5] = [
        "cursor_app",
        "profile_base",
        "archive_base",
        "workspace_base",
        "network_interface",
    ];

    /// Sets one field by name. Returns false for an unknown name.
    pub fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "cursor_app" => &mut self.cursor_app,
            "profile_base" => &mut self.profile_base,
            "archive_base" => &mut self.archive_base,
            "workspace_base" => &mut self.workspace_base,
            "network_interface" => &mut self.network_interface,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// An application the backend can launch a session with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherApp {
    pub name: String,
    pub exec_path: String,
    #[serde(default)]
    pub icon_path: Option<String>,
}

/// A session profile as the backend lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: String,
    pub path: String,
    pub created: String,
    #[serde(rename = "electron_app")]
    pub launcher_app: LauncherApp,
}

/// An archived copy of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveInfo {
    pub name: String,
    pub path: String,
    pub created: String,
    pub original_session: String,
}

/// Failures the backend reports for a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandError {
    /// No session with this name exists
    SessionNotFound { session: String },
    /// The session's profile directory is missing at launch time
    SessionDirectoryNotFound { path: String },
    /// A session with this name already exists
    SessionExists { session: String },
    /// No archive with this name exists
    ArchiveNotFound { archive: String },
    /// The archive destination is already taken
    ArchiveExists { path: String },
    /// The requested name cannot be used
    InvalidName { reason: String },
    /// MAC spoofing needs passwordless sudo
    SudoRequired { hint: String },
    /// The interface change did not take effect
    MacSpoofFailed { message: String },
    /// The launcher process could not be started
    LaunchFailed { message: String },
    /// Filesystem failure on the backend host
    Io { message: String },
    /// Anything else
    Internal { message: String },
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::SessionNotFound { session } => {
                write!(f, "Session '{}' not found", session)
            }
            CommandError::SessionDirectoryNotFound { path } => {
                write!(f, "Session directory not found: {}", path)
            }
            CommandError::SessionExists { session } => {
                write!(f, "Session '{}' already exists", session)
            }
            CommandError::ArchiveNotFound { archive } => {
                write!(f, "Archive '{}' not found", archive)
            }
            CommandError::ArchiveExists { path } => {
                write!(f, "Archive destination already exists: {}", path)
            }
            CommandError::InvalidName { reason } => write!(f, "Invalid name: {}", reason),
            CommandError::SudoRequired { hint } => {
                write!(f, "MAC spoofing requires sudo access. {}", hint)
            }
            CommandError::MacSpoofFailed { message } => {
                write!(f, "MAC address change failed: {}", message)
            }
            CommandError::LaunchFailed { message } => write!(f, "Failed to launch: {}", message),
            CommandError::Io { message } => write!(f, "I/O error: {}", message),
            CommandError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for CommandError {}

/// Result type for backend commands.
pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
#[path = "tests/rpc_tests.rs"]
mod tests;

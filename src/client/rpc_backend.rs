//! `CommandBackend` over tarpc.
//!
//! Uses TCP with bincode framing, matching the backend's listener.

use crate::client::{ClientError, ClientResult, CommandBackend};
use crate::rpc::command_service::CommandServiceClient;
use crate::rpc::{ArchiveInfo, BackendConfig, CommandResult, LauncherApp, SessionInfo};
use anyhow::Result;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tarpc::client::{self, RpcError};
use tarpc::tokio_serde::formats::Bincode;

/// Base delay for exponential backoff (milliseconds).
const BASE_DELAY_MS: u64 = 100;

/// RPC-backed command client.
pub struct RpcBackend {
    client: CommandServiceClient,
    call_deadline: Duration,
}

impl RpcBackend {
    /// Wraps an already spawned tarpc client.
    pub fn new(client: CommandServiceClient, call_deadline: Duration) -> Self {
        Self {
            client,
            call_deadline,
        }
    }

    /// Connects to the backend at `addr`, retrying with exponential backoff.
    pub async fn connect(addr: &str, attempts: u32, call_deadline: Duration) -> Result<Self> {
        let attempts = attempts.max(1);
        let mut delay_ms = BASE_DELAY_MS;

        for attempt in 1..=attempts {
            match Self::try_connect(addr).await {
                Ok(client) => {
                    tracing::debug!(addr, attempt, "connected to backend");
                    return Ok(Self::new(client, call_deadline));
                }
                Err(e) => {
                    tracing::debug!(addr, attempt, error = %e, "backend connect failed");
                }
            }

            if attempt < attempts {
                // Add jitter (±25%)
                let jitter = (delay_ms as f64 * 0.25 * (rand::random::<f64>() * 2.0 - 1.0)) as i64;
                let actual_delay = (delay_ms as i64 + jitter).max(10) as u64;
                tokio::time::sleep(Duration::from_millis(actual_delay)).await;
                delay_ms *= 2;
            }
        }

        anyhow::bail!(
            "Failed to connect to backend at {} after {} attempts",
            addr,
            attempts
        )
    }

    async fn try_connect(addr: &str) -> Result<CommandServiceClient> {
        use tarpc::serde_transport::tcp;

        let transport = tcp::connect(addr, Bincode::default).await?;
        Ok(CommandServiceClient::new(client::Config::default(), transport).spawn())
    }

    /// Per-call context. tarpc's default ten second deadline is shorter than
    /// a launch with MAC spoofing, so every call carries the configured one.
    /// A deadline past the representable range keeps tarpc's default.
    fn context(&self) -> tarpc::context::Context {
        let mut ctx = tarpc::context::current();
        if let Some(deadline) = Instant::now().checked_add(self.call_deadline) {
            ctx.deadline = deadline;
        }
        ctx
    }

    fn flatten<T>(
        &self,
        command: &str,
        response: Result<CommandResult<T>, RpcError>,
    ) -> ClientResult<T> {
        match response {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(ClientError::Backend(e)),
            Err(RpcError::DeadlineExceeded) => Err(ClientError::TimedOut {
                operation: command.to_string(),
                after: self.call_deadline,
            }),
            Err(e) => Err(ClientError::Transport {
                message: format!("{}: {}", command, e),
            }),
        }
    }
}

#[async_trait]
impl CommandBackend for RpcBackend {
    async fn get_config(&self) -> ClientResult<BackendConfig> {
        let response = self.client.get_config(self.context()).await;
        self.flatten("get_config", response)
    }

    async fn update_config(&self, config: BackendConfig) -> ClientResult<BackendConfig> {
        let response = self.client.update_config(self.context(), config).await;
        self.flatten("update_config", response)
    }

    async fn list_sessions(&self) -> ClientResult<Vec<SessionInfo>> {
        let response = self.client.list_sessions(self.context()).await;
        self.flatten("list_sessions", response)
    }

    async fn list_archives(&self) -> ClientResult<Vec<ArchiveInfo>> {
        let response = self.client.list_archives(self.context()).await;
        self.flatten("list_archives", response)
    }

    async fn create_session(
        &self,
        name: String,
        launcher_app: LauncherApp,
    ) -> ClientResult<String> {
        let response = self
            .client
            .create_session(self.context(), name, launcher_app)
            .await;
        self.flatten("create_session", response)
    }

    async fn launch_session(
        &self,
        session: String,
        spoof_mac: bool,
        connect_vpn: bool,
    ) -> ClientResult<String> {
        let response = self
            .client
            .launch_session(self.context(), session, spoof_mac, connect_vpn)
            .await;
        self.flatten("launch_session", response)
    }

    async fn spoof_mac(&self, interface: Option<String>) -> ClientResult<String> {
        let response = self.client.spoof_mac(self.context(), interface).await;
        self.flatten("spoof_mac", response)
    }

    async fn archive_session(&self, session: String) -> ClientResult<String> {
        let response = self.client.archive_session(self.context(), session).await;
        self.flatten("archive_session", response)
    }

    async fn restore_archive(
        &self,
        archive: String,
        new_session_name: Option<String>,
    ) -> ClientResult<String> {
        let response = self
            .client
            .restore_archive(self.context(), archive, new_session_name)
            .await;
        self.flatten("restore_archive", response)
    }

    async fn delete_session(&self, session: String) -> ClientResult<String> {
        let response = self.client.delete_session(self.context(), session).await;
        self.flatten("delete_session", response)
    }

    async fn delete_archive(&self, archive: String) -> ClientResult<String> {
        let response = self.client.delete_archive(self.context(), archive).await;
        self.flatten("delete_archive", response)
    }

    async fn random_mac(&self) -> ClientResult<String> {
        let response = self.client.random_mac(self.context()).await;
        self.flatten("random_mac", response)
    }

    async fn open_projects(&self, projects: Vec<String>) -> ClientResult<()> {
        let response = self.client.open_projects(self.context(), projects).await;
        self.flatten("open_projects", response)
    }

    async fn list_launcher_apps(&self) -> ClientResult<Vec<LauncherApp>> {
        let response = self.client.list_launcher_apps(self.context()).await;
        self.flatten("list_launcher_apps", response)
    }
}

#[cfg(test)]
#[path = "tests/rpc_backend_tests.rs"]
mod tests;

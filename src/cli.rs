//! Command-line front end.
//!
//! Session commands connect to the backend and drive a [`SessionsView`], so
//! the terminal sees the same messages the view would show. `monitor` runs
//! locally and never touches the backend.

use crate::client::{RpcBackend, SessionClient};
use crate::config::ClientConfig;
use crate::monitor::{default_endpoints, Monitor, MonitorSnapshot, SimulatedSource};
use crate::rpc::BackendConfig;
use crate::view::{MonitorPanel, NotificationKind, SessionsView};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser)]
#[command(name = "sessiondeck")]
#[command(about = "Manage isolated IDE sessions and watch local dev services")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SESSION_DECK_GIT_SHA"), ")"))]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Config file (defaults to ~/.session-deck/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List sessions
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create a session
    Create {
        name: String,
        /// Project path to attach (repeatable)
        #[arg(short, long = "project", required = true)]
        projects: Vec<String>,
        /// Launcher application name (see `apps`)
        #[arg(short, long)]
        launcher: Option<String>,
    },
    /// Launch a session
    Launch {
        session: String,
        /// Spoof the MAC address first
        #[arg(long)]
        spoof_mac: bool,
        /// Connect the VPN first
        #[arg(long)]
        vpn: bool,
    },
    /// Delete a session
    Delete {
        session: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Open project paths in the launcher
    Open {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// List launcher applications
    Apps,
    /// List archives
    Archives {
        #[arg(long)]
        json: bool,
    },
    /// Archive a session
    Archive { session: String },
    /// Restore an archive as a session
    Restore {
        archive: String,
        /// Session name to restore into (defaults to the original)
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete an archive
    DeleteArchive { archive: String },
    /// Spoof the MAC address of a network interface
    SpoofMac {
        #[arg(long)]
        interface: Option<String>,
    },
    /// Print a random MAC address
    RandomMac,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Watch the simulated dashboard
    Monitor {
        /// Stop after this many snapshots (default: until Ctrl-C)
        #[arg(long)]
        ticks: Option<u32>,
        #[arg(long)]
        json: bool,
        /// App id to stop after the first refresh (repeatable)
        #[arg(long = "stop-app")]
        stop_apps: Vec<String>,
        /// App id to restart after the first refresh (repeatable)
        #[arg(long = "restart-app")]
        restart_apps: Vec<String>,
        /// MCP server id to stop after the first refresh (repeatable)
        #[arg(long = "stop-server")]
        stop_servers: Vec<String>,
        /// MCP server id to restart after the first refresh (repeatable)
        #[arg(long = "restart-server")]
        restart_servers: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the client configuration
    Show {
        /// Also fetch the backend's settings
        #[arg(long)]
        backend: bool,
    },
    /// Change one backend setting
    Set { field: String, value: String },
}

pub fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => crate::paths::config_path()?,
    };
    tracing::debug!(path = %path.display(), "loading config");
    ClientConfig::load_or_default(&path)
}

async fn connect(config: &ClientConfig) -> Result<SessionClient> {
    let backend = RpcBackend::connect(
        &config.backend.address,
        config.backend.connect_attempts,
        config.backend.call_deadline(),
    )
    .await?;
    Ok(SessionClient::new(Arc::new(backend), config.timeouts.clone()))
}

async fn sessions_view(config: &ClientConfig) -> Result<SessionsView> {
    let client = connect(config).await?;
    Ok(SessionsView::new(client, config.ui.clone()))
}

/// Prints the view's latest notification. An error notification fails the
/// command.
fn report(view: &SessionsView) -> Result<()> {
    match view.notifications.latest() {
        Some(n) if n.kind == NotificationKind::Error => bail!("{}", n.message),
        Some(n) => {
            println!("{}", n.message);
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

pub async fn run(cli: Cli, config: ClientConfig) -> Result<()> {
    match cli.command {
        Command::List { json } => {
            let mut view = sessions_view(&config).await?;
            view.load_sessions().await;
            if json {
                return print_json(&view.sessions);
            }
            if view.sessions.is_empty() {
                println!("No sessions.");
            }
            for session in &view.sessions {
                println!(
                    "{:<24} {:<20} {}",
                    session.name, session.launcher_app.name, session.created_date
                );
            }
            Ok(())
        }
        Command::Create {
            name,
            projects,
            launcher,
        } => {
            let mut view = sessions_view(&config).await?;
            view.open_form().await;
            if let Some(wanted) = launcher {
                let Some(app) = view
                    .launcher_apps
                    .iter()
                    .find(|a| a.name.eq_ignore_ascii_case(&wanted))
                    .cloned()
                else {
                    let available: Vec<&str> =
                        view.launcher_apps.iter().map(|a| a.name.as_str()).collect();
                    bail!(
                        "Unknown launcher '{}'. Available: {}",
                        wanted,
                        available.join(", ")
                    );
                };
                view.form.launcher = Some(app);
            } else if let [only] = view.launcher_apps.as_slice() {
                view.form.launcher = Some(only.clone());
            }
            view.form.name = name;
            view.form.project_paths = projects.join("\n");
            view.submit_form().await;
            report(&view)
        }
        Command::Launch {
            session,
            spoof_mac,
            vpn,
        } => {
            let mut view = sessions_view(&config).await?;
            view.load_sessions().await;
            view.spoof_mac = spoof_mac;
            view.connect_vpn = vpn;
            if spoof_mac {
                println!("Spoofing MAC address... (this may take up to 60 seconds)");
            }
            view.launch(&session).await;
            report(&view)
        }
        Command::Delete { session, yes } => {
            let mut view = sessions_view(&config).await?;
            view.load_sessions().await;
            if view.session(&session).is_none() {
                bail!("Session '{}' not found", session);
            }
            view.request_delete(&session);
            if yes || confirm(&format!("Delete session '{}'?", session)).await? {
                view.confirm_delete().await;
                report(&view)
            } else {
                view.cancel_delete();
                println!("Cancelled.");
                Ok(())
            }
        }
        Command::Open { paths } => {
            let client = connect(&config).await?;
            if !client.open_projects(&paths).await {
                bail!("Failed to open projects");
            }
            println!("Opened {} project(s)", paths.len());
            Ok(())
        }
        Command::Apps => {
            let mut view = sessions_view(&config).await?;
            view.load_launcher_apps().await;
            if view.launcher_apps.is_empty() {
                println!("No launcher applications found.");
            }
            for app in &view.launcher_apps {
                println!("{:<24} {}", app.name, app.exec_path);
            }
            Ok(())
        }
        Command::Archives { json } => {
            let mut view = sessions_view(&config).await?;
            view.load_archives().await;
            if json {
                return print_json(&view.archives);
            }
            if view.archives.is_empty() {
                println!("No archives.");
            }
            for archive in &view.archives {
                println!(
                    "{:<40} {:<20} {}",
                    archive.name, archive.original_session, archive.created
                );
            }
            Ok(())
        }
        Command::Archive { session } => {
            let mut view = sessions_view(&config).await?;
            view.archive_session(&session).await;
            report(&view)
        }
        Command::Restore { archive, name } => {
            let mut view = sessions_view(&config).await?;
            view.restore_archive(&archive, name.as_deref()).await;
            report(&view)
        }
        Command::DeleteArchive { archive } => {
            let mut view = sessions_view(&config).await?;
            view.delete_archive(&archive).await;
            report(&view)
        }
        Command::SpoofMac { interface } => {
            let mut view = sessions_view(&config).await?;
            view.spoof_mac_address(interface).await;
            report(&view)
        }
        Command::RandomMac => {
            let mut view = sessions_view(&config).await?;
            match view.random_mac().await {
                Some(mac) => {
                    println!("{}", mac);
                    Ok(())
                }
                None => report(&view),
            }
        }
        Command::Config { action } => run_config(action, &config).await,
        Command::Monitor {
            ticks,
            json,
            stop_apps,
            restart_apps,
            stop_servers,
            restart_servers,
        } => {
            let controls = Controls {
                stop_apps,
                restart_apps,
                stop_servers,
                restart_servers,
            };
            run_monitor(&config, ticks, json, controls).await
        }
    }
}

async fn run_config(action: ConfigAction, config: &ClientConfig) -> Result<()> {
    match action {
        ConfigAction::Show { backend } => {
            print!(
                "{}",
                serde_yaml::to_string(config).context("Failed to serialize config")?
            );
            if backend {
                let client = connect(config).await?;
                let remote = client.get_config().await?;
                println!("---");
                print!(
                    "{}",
                    serde_yaml::to_string(&remote).context("Failed to serialize backend config")?
                );
            }
            Ok(())
        }
        ConfigAction::Set { field, value } => {
            let client = connect(config).await?;
            let mut remote = client.get_config().await?;
            if !remote.set_field(&field, value) {
                bail!(
                    "Unknown setting '{}'. Expected one of: {}",
                    field,
                    BackendConfig::FIELDS.join(", ")
                );
            }
            let updated = client.update_config(remote).await?;
            print!(
                "{}",
                serde_yaml::to_string(&updated).context("Failed to serialize backend config")?
            );
            Ok(())
        }
    }
}

struct Controls {
    stop_apps: Vec<String>,
    restart_apps: Vec<String>,
    stop_servers: Vec<String>,
    restart_servers: Vec<String>,
}

async fn run_monitor(
    config: &ClientConfig,
    ticks: Option<u32>,
    json: bool,
    controls: Controls,
) -> Result<()> {
    let endpoints = config
        .monitor
        .endpoints
        .clone()
        .unwrap_or_else(default_endpoints);
    let monitor = Monitor::new(
        Arc::new(SimulatedSource::new(endpoints)),
        config.monitor.settings(),
    );
    let mut panel = MonitorPanel::new(
        monitor.clone(),
        Duration::from_secs(config.ui.notification_secs),
    );

    monitor.start().await;
    for id in &controls.stop_apps {
        panel.stop_app(id);
        print_panel_notification(&panel);
    }
    for id in &controls.restart_apps {
        panel.restart_app(id);
        print_panel_notification(&panel);
    }
    for id in &controls.stop_servers {
        panel.stop_server(id);
        print_panel_notification(&panel);
    }
    for id in &controls.restart_servers {
        panel.restart_server(id);
        print_panel_notification(&panel);
    }

    let interval = monitor.settings().interval;
    let mut printed = 0u32;
    loop {
        let snapshot = panel.snapshot();
        if json {
            println!(
                "{}",
                serde_json::to_string(&snapshot).context("Failed to serialize snapshot")?
            );
        } else {
            print_snapshot(&snapshot);
        }
        printed += 1;
        if ticks.is_some_and(|limit| printed >= limit) {
            break;
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("monitor interrupted");
                break;
            }
        }
        panel.tick(std::time::Instant::now());
    }
    monitor.stop();
    Ok(())
}

fn print_panel_notification(panel: &MonitorPanel) {
    if let Some(n) = panel.notifications.latest() {
        match n.kind {
            NotificationKind::Error => eprintln!("{}", n.message),
            _ => println!("{}", n.message),
        }
    }
}

fn print_snapshot(snapshot: &MonitorSnapshot) {
    let stats = &snapshot.system_stats;
    let refreshed = snapshot
        .refreshed_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!(
        "[{}] memory {}/{} MB  cpu {}%  connections {}",
        refreshed,
        stats.used_memory_mb,
        stats.total_memory_mb,
        stats.cpu_percent,
        stats.active_connections
    );
    println!("  Applications:");
    for app in &snapshot.running_apps {
        println!(
            "    {:<18} :{:<5} pid {:<6} {:<6} {:>4} MB {:>5.1}% {:>4}ms  up {}",
            app.name,
            app.port,
            app.pid,
            app.status.label(),
            app.memory_mb,
            app.cpu_percent,
            app.response_time_ms,
            app.uptime
        );
    }
    println!("  MCP servers:");
    for server in &snapshot.mcp_servers {
        let port = server
            .port
            .map(|p| format!(":{}", p))
            .unwrap_or_default();
        let latency = server
            .response_time_ms
            .map(|ms| format!("{}ms", ms))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {:<18} {:<6} {:<12} {:<6} last active {}",
            server.name,
            port,
            server.status.label(),
            latency,
            server.last_active
        );
    }
}

/// Asks a yes/no question on the terminal. Anything but `y`/`yes` is no.
async fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{} [y/N] ", prompt).as_bytes())
        .await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read confirmation")?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

use super::*;
use crate::client::test_support::{launcher, FakeBackend};
use crate::config::TimeoutConfig;
use crate::view::action_status::ActionPhase;
use crate::view::notification::NotificationKind;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn view_for(backend: Arc<FakeBackend>) -> SessionsView {
    view_with_timeouts(backend, TimeoutConfig::default())
}

fn view_with_timeouts(backend: Arc<FakeBackend>, timeouts: TimeoutConfig) -> SessionsView {
    SessionsView::new(SessionClient::new(backend, timeouts), UiConfig::default())
}

fn latest(view: &SessionsView) -> (String, NotificationKind) {
    let n = view.notifications.latest().expect("a notification");
    (n.message.clone(), n.kind)
}

#[tokio::test]
async fn test_load_sessions_degrades_to_empty() {
    let backend = FakeBackend::with_sessions(&["alpha", "beta"]);
    let mut view = view_for(backend.clone());
    view.load_sessions().await;
    assert_eq!(view.sessions.len(), 2);

    backend.offline.store(true, Ordering::SeqCst);
    view.load_sessions().await;
    assert!(view.sessions.is_empty());
}

#[tokio::test]
async fn test_open_form_loads_launcher_apps() {
    let backend = FakeBackend::with_sessions(&[]);
    let mut view = view_for(backend.clone());
    view.open_form().await;
    assert!(view.form.visible);
    assert_eq!(view.launcher_apps, vec![launcher()]);

    view.close_form();
    assert!(!view.form.visible);
}

#[tokio::test]
async fn test_blank_form_makes_no_create_call() {
    let backend = FakeBackend::with_sessions(&[]);
    let mut view = view_for(backend.clone());

    view.form.name = "   ".to_string();
    view.form.project_paths = "/src".to_string();
    view.form.launcher = Some(launcher());
    assert!(!view.submit_form().await);
    assert_eq!(
        latest(&view),
        ("Please enter a session name".to_string(), NotificationKind::Error)
    );

    view.form.name = "work".to_string();
    view.form.project_paths = "\n  \n".to_string();
    assert!(!view.submit_form().await);
    assert_eq!(latest(&view).0, "Please add at least one project path");

    assert!(!backend.called("create_session"));
    assert_eq!(view.status.phase(), ActionPhase::Idle);
}

#[tokio::test]
async fn test_submit_form_creates_and_resets() {
    let backend = FakeBackend::with_sessions(&[]);
    let mut view = view_for(backend.clone());
    view.open_form().await;
    view.form.name = "work".to_string();
    view.form.project_paths = "/src/api\n\n/src/web".to_string();
    view.form.launcher = Some(launcher());

    assert!(view.submit_form().await);
    assert_eq!(
        latest(&view),
        ("Session created successfully!".to_string(), NotificationKind::Success)
    );
    assert_eq!(view.status.phase(), ActionPhase::Success);
    assert!(!view.form.visible);
    assert!(view.form.name.is_empty());

    let session = view.session("work").unwrap();
    assert_eq!(session.projects, vec!["/src/api".to_string(), "/src/web".to_string()]);
}

#[tokio::test]
async fn test_submit_form_reports_backend_failure() {
    let backend = FakeBackend::with_sessions(&["work"]);
    let mut view = view_for(backend.clone());
    view.form.name = "work".to_string();
    view.form.project_paths = "/src".to_string();
    view.form.launcher = Some(launcher());

    assert!(!view.submit_form().await);
    assert_eq!(
        latest(&view).0,
        "Failed to create session: Session 'work' already exists"
    );
    assert_eq!(view.status.phase(), ActionPhase::Error);
    assert_eq!(view.form.name, "work");
}

#[tokio::test]
async fn test_launch_opens_projects() {
    let backend = FakeBackend::with_sessions(&[]);
    let mut view = view_for(backend.clone());
    view.form.name = "work".to_string();
    view.form.project_paths = "/src/api".to_string();
    view.form.launcher = Some(launcher());
    assert!(view.submit_form().await);

    assert!(view.launch("work").await);
    assert_eq!(latest(&view).0, "Session launched: work");
    assert_eq!(
        backend.opened_projects.lock().unwrap().clone(),
        vec![vec!["/src/api".to_string()]]
    );
    assert_eq!(view.status.message(), "Projects opened successfully!");
}

#[tokio::test]
async fn test_launch_without_projects_skips_open() {
    let backend = FakeBackend::with_sessions(&["work"]);
    let mut view = view_for(backend.clone());
    view.load_sessions().await;

    assert!(view.launch("work").await);
    assert!(!backend.called("open_projects"));
    assert_eq!(view.status.message(), "Session launched successfully!");
}

#[tokio::test]
async fn test_launch_timeout_message() {
    let backend = FakeBackend::with_sessions(&["work"]);
    backend.set_delay(Duration::from_millis(300));
    let timeouts = TimeoutConfig {
        launch_ms: 50,
        launch_with_spoof_ms: 50,
        spoof_mac_ms: 50,
        delete_ms: 50,
    };
    let mut view = view_with_timeouts(backend, timeouts);
    view.load_sessions().await;

    assert!(!view.launch("work").await);
    assert_eq!(
        latest(&view),
        (
            "Operation timed out. Please check your network connection and permissions."
                .to_string(),
            NotificationKind::Error
        )
    );
    assert_eq!(view.status.message(), "Launch failed!");
}

#[tokio::test]
async fn test_launch_error_messages_follow_error_kind() {
    let backend = FakeBackend::with_sessions(&["work"]);
    let mut view = view_for(backend.clone());
    view.load_sessions().await;
    view.spoof_mac = true;

    *backend.launch_error.lock().unwrap() = Some(CommandError::SudoRequired {
        hint: "configure sudoers".to_string(),
    });
    assert!(!view.launch("work").await);
    assert!(latest(&view).0.starts_with("MAC spoofing requires admin access."));

    *backend.launch_error.lock().unwrap() = Some(CommandError::SessionDirectoryNotFound {
        path: "/profiles/work".to_string(),
    });
    assert!(!view.launch("work").await);
    assert_eq!(
        latest(&view).0,
        "Session directory not found. Please try creating the session again."
    );

    *backend.launch_error.lock().unwrap() = Some(CommandError::LaunchFailed {
        message: "exec failed".to_string(),
    });
    assert!(!view.launch("work").await);
    assert!(latest(&view).0.starts_with("Failed to launch session: "));
}

#[test]
fn test_launch_failure_message_for_transport() {
    let err = ClientError::Transport {
        message: "connection refused".to_string(),
    };
    assert_eq!(
        launch_failure_message(&err),
        "Failed to launch session: Backend unreachable: connection refused"
    );
}

#[tokio::test]
async fn test_cancel_delete_issues_no_command() {
    let backend = FakeBackend::with_sessions(&["work", "play"]);
    let mut view = view_for(backend.clone());
    view.load_sessions().await;

    view.request_delete("work");
    assert!(matches!(
        view.confirmation_pending,
        Some(ConfirmationState::DeleteSession { .. })
    ));
    view.cancel_delete();
    assert!(view.confirmation_pending.is_none());

    assert!(!view.confirm_delete().await);
    assert!(!backend.called("delete_session"));
    assert_eq!(view.sessions.len(), 2);
}

#[tokio::test]
async fn test_confirm_delete_removes_session() {
    let backend = FakeBackend::with_sessions(&["work", "play"]);
    let mut view = view_for(backend.clone());
    view.load_sessions().await;

    view.request_delete("work");
    assert!(!backend.called("delete_session"));
    assert!(view.confirm_delete().await);
    assert_eq!(latest(&view).0, "Session \"work\" deleted successfully!");
    assert!(view.session("work").is_none());
    assert_eq!(view.sessions.len(), 1);
    assert!(view.confirmation_pending.is_none());
}

#[tokio::test]
async fn test_confirm_delete_failure_keeps_list() {
    let backend = FakeBackend::with_sessions(&["work"]);
    let mut view = view_for(backend.clone());
    view.load_sessions().await;
    backend.offline.store(true, Ordering::SeqCst);

    view.request_delete("work");
    assert!(!view.confirm_delete().await);
    assert!(latest(&view).0.starts_with("Failed to delete session: "));
    assert_eq!(view.sessions.len(), 1);
}

#[tokio::test]
async fn test_archive_and_restore_reload_lists() {
    let backend = FakeBackend::with_sessions(&["work"]);
    let mut view = view_for(backend.clone());
    view.load_sessions().await;

    assert!(view.archive_session("work").await);
    assert_eq!(view.archives.len(), 1);

    let archive = view.archives[0].name.clone();
    assert!(view.restore_archive(&archive, Some("work-2")).await);
    assert!(view.session("work-2").is_some());

    assert!(view.delete_archive(&archive).await);
    assert!(view.archives.is_empty());

    assert!(!view.delete_archive(&archive).await);
    assert_eq!(latest(&view).1, NotificationKind::Error);
}

#[tokio::test]
async fn test_settings_helpers() {
    let backend = FakeBackend::with_sessions(&[]);
    let mut view = view_for(backend.clone());

    assert_eq!(view.random_mac().await.as_deref(), Some("02:de:ad:be:ef:01"));
    assert!(view.spoof_mac_address(Some("en1".to_string())).await);
    assert!(view.last_mac_result.as_deref().unwrap().contains("en1"));

    backend.offline.store(true, Ordering::SeqCst);
    assert!(view.random_mac().await.is_none());
    assert!(!view.spoof_mac_address(None).await);
}

#[tokio::test]
async fn test_tick_expires_status_and_notification() {
    let backend = FakeBackend::with_sessions(&["work"]);
    let mut view = view_for(backend);
    view.load_sessions().await;
    assert!(view.launch("work").await);

    view.tick(Instant::now() + Duration::from_secs(60));
    assert_eq!(view.status.phase(), ActionPhase::Idle);
    assert!(view.notifications.latest().is_none());
}

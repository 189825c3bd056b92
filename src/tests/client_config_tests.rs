use super::*;
use serial_test::serial;
use std::io::Write;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_match_documented_values() {
    let config = ClientConfig::default();
    assert_eq!(config.backend.address, "127.0.0.1:7420");
    assert_eq!(config.backend.connect_attempts, 5);
    assert_eq!(config.timeouts.launch(false), Duration::from_secs(30));
    assert_eq!(config.timeouts.launch(true), Duration::from_secs(60));
    assert_eq!(config.timeouts.spoof_mac(), Duration::from_secs(30));
    assert_eq!(config.timeouts.delete(), Duration::from_secs(10));
    assert_eq!(config.monitor.settings().interval, Duration::from_secs(3));
    assert_eq!(config.monitor.max_servers, 8);
    assert_eq!(config.ui.notification_secs, 5);
    assert!(config.ui.require_launcher);
}

#[test]
fn test_partial_yaml_keeps_other_defaults() {
    let file = write_config(
        r#"
timeouts:
  launch_ms: 1500
monitor:
  interval_ms: 250
"#,
    );

    let config = ClientConfig::load(file.path()).unwrap();
    assert_eq!(config.timeouts.launch_ms, 1500);
    assert_eq!(config.timeouts.launch_with_spoof_ms, 60_000);
    assert_eq!(config.monitor.interval_ms, 250);
    assert_eq!(config.monitor.max_servers, 8);
    assert_eq!(config.backend.address, "127.0.0.1:7420");
}

#[test]
fn test_endpoint_table_override() {
    let file = write_config(
        r#"
monitor:
  endpoints:
    - name: Search MCP
      endpoint: http://localhost:4100/mcp
      kind: tool
"#,
    );

    let config = ClientConfig::load(file.path()).unwrap();
    let endpoints = config.monitor.endpoints.unwrap();
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].name, "Search MCP");
}

#[test]
fn test_zero_timeout_is_rejected() {
    let file = write_config("timeouts:\n  delete_ms: 0\n");
    let err = ClientConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("timeouts.delete_ms"));
}

#[test]
fn test_invalid_yaml_reports_path() {
    let file = write_config("backend: [not, a, map");
    let err = ClientConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    std::env::remove_var(BACKEND_ENV);
    let temp = tempfile::tempdir().unwrap();
    let config = ClientConfig::load_or_default(&temp.path().join("absent.yaml")).unwrap();
    assert_eq!(config.backend.address, "127.0.0.1:7420");
}

#[test]
#[serial]
fn test_backend_env_override() {
    std::env::set_var(BACKEND_ENV, "10.0.0.5:9000");
    let temp = tempfile::tempdir().unwrap();
    let config = ClientConfig::load_or_default(&temp.path().join("absent.yaml")).unwrap();
    std::env::remove_var(BACKEND_ENV);
    assert_eq!(config.backend.address, "10.0.0.5:9000");
}

#[test]
fn test_zero_call_deadline_is_rejected() {
    let file = write_config("backend:\n  call_deadline_secs: 0\n");
    let err = ClientConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("backend.call_deadline_secs"));
}

#[test]
fn test_call_deadline_shorter_than_spoof_launch_is_rejected() {
    // Default launch with spoofing is 60s.
    let file = write_config("backend:\n  call_deadline_secs: 30\n");
    let err = ClientConfig::load(file.path()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("backend.call_deadline_secs (30s)"));
    assert!(message.contains("60000ms"));
}

#[test]
fn test_oversized_durations_are_rejected() {
    let cases = [
        ("backend:\n  call_deadline_secs: 18446744073709551615\n", "backend.call_deadline_secs"),
        ("ui:\n  create_status_secs: 18446744073709551615\n", "ui.create_status_secs"),
        ("ui:\n  launch_status_secs: 86401\n", "ui.launch_status_secs"),
        ("ui:\n  notification_secs: 18446744073709551615\n", "ui.notification_secs"),
        ("monitor:\n  interval_ms: 18446744073709551615\n", "monitor.interval_ms"),
        ("monitor:\n  rescan_delay_ms: 86400001\n", "monitor.rescan_delay_ms"),
        ("timeouts:\n  launch_with_spoof_ms: 86400001\n", "timeouts.launch_with_spoof_ms"),
    ];
    for (content, field) in cases {
        let file = write_config(content);
        let err = ClientConfig::load(file.path()).unwrap_err();
        assert!(
            err.to_string().contains(field),
            "expected {} in error, got: {}",
            field,
            err
        );
    }
}

#[test]
fn test_one_day_bounds_are_accepted() {
    let file = write_config(
        r#"
backend:
  call_deadline_secs: 86400
ui:
  delete_status_secs: 86400
  notification_secs: 0
monitor:
  rescan_delay_ms: 0
"#,
    );
    let config = ClientConfig::load(file.path()).unwrap();
    assert_eq!(config.backend.call_deadline(), Duration::from_secs(86_400));
    assert_eq!(config.ui.delete_status_secs, 86_400);
}

//! Config discovery through the working directory and the environment.

use std::path::PathBuf;

use plansim_infra::config::{load, load_from_file};
use serial_test::serial;
use tempfile::TempDir;

const VARS: &[&str] = &[
    "PLANSIM_GRAPHQL_URL",
    "PLANSIM_GATEWAY_URL",
    "PLANSIM_TOKEN",
    "PLANSIM_ADMIN_SECRET",
    "PLANSIM_ROLE",
    "PLANSIM_HTTP_TIMEOUT",
    "PLANSIM_HTTP_MAX_ATTEMPTS",
    "PLANSIM_POLL_PERIOD",
    "PLANSIM_MAX_POLLS",
];

struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    fn enter(dir: &TempDir) -> Self {
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        Self { previous }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        std::env::set_current_dir(&self.previous).ok();
        for key in VARS {
            std::env::remove_var(key);
        }
    }
}

fn clear_env() {
    for key in VARS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn file_in_working_directory_is_discovered() {
    clear_env();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("plansim.toml"),
        r#"
graphql_url = "http://mission:8080/v1/graphql"
gateway_url = "http://mission:9000"

[auth]
role = "planner"

[http]
timeout_secs = 10
max_attempts = 2
base_backoff_ms = 50

[poll]
period_secs = 3
"#,
    )
    .unwrap();
    let _guard = CwdGuard::enter(&dir);
    std::env::set_var("PLANSIM_TOKEN", "from-env");

    let config = load().unwrap();

    assert_eq!(config.graphql_url, "http://mission:8080/v1/graphql");
    assert_eq!(config.auth.role.as_deref(), Some("planner"));
    assert_eq!(config.auth.token.as_deref(), Some("from-env"));
    assert_eq!(config.http.max_attempts, 2);
    assert_eq!(config.poll.period_secs, 3);
    assert_eq!(config.poll.max_polls, None);
}

#[test]
#[serial]
fn environment_wins_over_files() {
    clear_env();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("plansim.json"),
        r#"{"graphql_url": "http://file/v1/graphql", "gateway_url": "http://file:9000"}"#,
    )
    .unwrap();
    let _guard = CwdGuard::enter(&dir);
    std::env::set_var("PLANSIM_GRAPHQL_URL", "http://env/v1/graphql");

    let config = load().unwrap();

    assert_eq!(config.graphql_url, "http://env/v1/graphql");
    assert_eq!(config.gateway_url, plansim_domain::constants::DEFAULT_GATEWAY_URL);
}

#[test]
#[serial]
fn dotenv_file_feeds_the_environment() {
    clear_env();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "PLANSIM_GRAPHQL_URL=http://dotenv/v1/graphql\nPLANSIM_MAX_POLLS=7\n",
    )
    .unwrap();
    let _guard = CwdGuard::enter(&dir);

    let config = load().unwrap();

    assert_eq!(config.graphql_url, "http://dotenv/v1/graphql");
    assert_eq!(config.poll.max_polls, Some(7));
}

#[test]
#[serial]
fn secrets_in_files_are_not_written_back_out() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plansim.json");
    std::fs::write(
        &path,
        r#"{"graphql_url": "http://a/v1/graphql", "gateway_url": "http://a:9000",
            "auth": {"token": "t0k", "admin_secret": "s3cret"}}"#,
    )
    .unwrap();

    let config = load_from_file(Some(path)).unwrap();
    assert_eq!(config.auth.admin_secret.as_deref(), Some("s3cret"));

    let rendered = serde_json::to_string(&config).unwrap();
    assert!(!rendered.contains("s3cret"));
    assert!(!rendered.contains("t0k"));
}

#[test]
#[serial]
fn invalid_file_is_a_config_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plansim.toml");
    std::fs::write(&path, "graphql_url = [").unwrap();

    let err = load_from_file(Some(path)).unwrap_err();
    assert!(matches!(err, plansim_domain::PlanError::Config(_)));
}

#![allow(clippy::unwrap_used)]
// Integration tests for config loading, secret resolution, and `connect`.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use usergrid_api::{AuthType, TlsMode};
use usergrid_config::{
    Config, ConfigError, Defaults, Profile, connect, load_config_from, profile_to_client_config,
    resolve_secret, save_config_to,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn profile(base_url: &str) -> Profile {
    Profile {
        base_url: base_url.into(),
        organization: "acme".into(),
        application: "sandbox".into(),
        ..Profile::default()
    }
}

// ── Loading / saving ────────────────────────────────────────────────

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    assert_eq!(cfg.defaults.timeout, 30);
    assert!(!cfg.defaults.insecure);
    assert!(cfg.profiles.is_empty());
}

#[test]
fn test_load_profiles_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(
        &file,
        r#"
default_profile = "prod"

[defaults]
timeout = 45

[profiles.prod]
base_url = "https://usergrid.example.com/"
organization = "acme"
application = "storefront"
auth_type = "application"
login_id = "YXA6client"
secret_env = "STOREFRONT_SECRET"

[profiles.local]
organization = "acme"
application = "sandbox"
insecure = true
"#,
    )
    .unwrap();

    let cfg = load_config_from(&file).unwrap();
    assert_eq!(cfg.defaults.timeout, 45);

    let (name, prod) = cfg.profile(None).unwrap();
    assert_eq!(name, "prod");
    assert_eq!(prod.application, "storefront");
    assert_eq!(prod.auth_type, AuthType::Application);
    assert_eq!(prod.login_id.as_deref(), Some("YXA6client"));

    let (_, local) = cfg.profile(Some("local")).unwrap();
    assert_eq!(local.base_url, usergrid_api::DEFAULT_BASE_URL);
    assert_eq!(local.auth_type, AuthType::Application);
    assert_eq!(local.insecure, Some(true));

    assert!(matches!(
        cfg.profile(Some("staging")),
        Err(ConfigError::UnknownProfile { ref name }) if name == "staging"
    ));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    let mut p = profile("https://usergrid.example.com/");
    p.auth_type = AuthType::User;
    p.login_id = Some("jdoe".into());
    p.timeout = Some(5);
    cfg.profiles.insert("default".into(), p);
    save_config_to(&cfg, &file).unwrap();

    let loaded = load_config_from(&file).unwrap();
    let (_, p) = loaded.profile(None).unwrap();
    assert_eq!(p.organization, "acme");
    assert_eq!(p.auth_type, AuthType::User);
    assert_eq!(p.login_id.as_deref(), Some("jdoe"));
    assert_eq!(p.timeout, Some(5));
}

// ── Client config translation ───────────────────────────────────────

#[test]
fn test_profile_to_client_config() {
    let mut p = profile("https://usergrid.example.com/");
    p.timeout = Some(10);
    let cfg = profile_to_client_config(&p, &Defaults::default()).unwrap();

    assert_eq!(cfg.base_url, "https://usergrid.example.com/");
    assert_eq!(cfg.organization, "acme");
    assert_eq!(cfg.application, "sandbox");
    assert_eq!(cfg.transport.timeout, Duration::from_secs(10));
    assert!(matches!(cfg.transport.tls, TlsMode::System));

    p.insecure = Some(true);
    let cfg = profile_to_client_config(&p, &Defaults::default()).unwrap();
    assert!(matches!(cfg.transport.tls, TlsMode::DangerAcceptInvalid));
    assert_eq!(cfg.transport.timeout, Duration::from_secs(10));

    p.insecure = None;
    p.ca_cert = Some("/etc/ssl/usergrid-ca.pem".into());
    let cfg = profile_to_client_config(&p, &Defaults::default()).unwrap();
    assert!(matches!(cfg.transport.tls, TlsMode::CustomCa(_)));
}

#[test]
fn test_profile_validation() {
    let bad_url = profile("not a url");
    assert!(matches!(
        profile_to_client_config(&bad_url, &Defaults::default()),
        Err(ConfigError::Validation { ref field, .. }) if field == "base_url"
    ));

    let mut no_app = profile("https://usergrid.example.com/");
    no_app.application = "  ".into();
    assert!(matches!(
        profile_to_client_config(&no_app, &Defaults::default()),
        Err(ConfigError::Validation { ref field, .. }) if field == "application"
    ));
}

// ── Secret resolution ───────────────────────────────────────────────

#[test]
fn test_secret_from_named_env_var() {
    let mut p = profile("https://usergrid.example.com/");
    // Cargo sets this for every test binary.
    p.secret_env = Some("CARGO_MANIFEST_DIR".into());
    p.secret = Some("plaintext".into());

    let secret = resolve_secret(&p, "env-test").unwrap();
    assert_eq!(secret.expose_secret(), env!("CARGO_MANIFEST_DIR"));
}

#[test]
fn test_secret_falls_back_to_plaintext() {
    let mut p = profile("https://usergrid.example.com/");
    p.secret_env = Some("USERGRID_TEST_SURELY_UNSET_VARIABLE".into());
    p.secret = Some("plaintext".into());

    let secret = resolve_secret(&p, "plaintext-test").unwrap();
    assert_eq!(secret.expose_secret(), "plaintext");
}

#[test]
fn test_no_secret_anywhere() {
    let p = profile("https://usergrid.example.com/");
    let result = resolve_secret(&p, "nothing-test");
    assert!(matches!(
        result,
        Err(ConfigError::NoCredentials { ref profile }) if profile == "nothing-test"
    ));
}

// ── connect ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_logs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/acme/sandbox/token"))
        .and(body_json(json!({
            "grant_type": "password",
            "username": "jdoe",
            "password": "hunter2",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut p = profile(&server.uri());
    p.auth_type = AuthType::User;
    p.login_id = Some("jdoe".into());
    p.secret = Some("hunter2".into());
    let mut cfg = Config::default();
    cfg.profiles.insert("connect-test".into(), p);

    let client = connect(&cfg, Some("connect-test")).await.unwrap();
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().organization(), "acme");
}

#[tokio::test]
async fn test_connect_without_login_id_stays_anonymous() {
    let server = MockServer::start().await;

    let mut cfg = Config::default();
    cfg.profiles.insert("default".into(), profile(&server.uri()));

    let client = connect(&cfg, None).await.unwrap();
    assert!(!client.session().is_authenticated());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connect_surfaces_login_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/acme/sandbox/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "invalid username or password",
        })))
        .mount(&server)
        .await;

    let mut p = profile(&server.uri());
    p.auth_type = AuthType::User;
    p.login_id = Some("jdoe".into());
    p.secret = Some("wrong".into());
    let mut cfg = Config::default();
    cfg.profiles.insert("default".into(), p);

    let err = connect(&cfg, None).await.unwrap_err();
    assert!(
        matches!(&err, ConfigError::Api(api) if api.is_unauthorized()),
        "expected unauthorized API error, got: {err:?}"
    );
}

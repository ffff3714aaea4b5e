#![allow(clippy::unwrap_used)]
// Integration tests for notifier registration and notification publishing.

use std::io::Write;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use usergrid_api::{
    Client, Error, Notification, NotificationRecipients, NotificationSchedule, Notifier, Session,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let session = Session::new(&server.uri(), "acme", "sandbox").unwrap();
    let client = Client::with_client(reqwest::Client::new(), session);
    (server, client)
}

fn app_path(suffix: &str) -> String {
    format!("/acme/sandbox/{suffix}")
}

fn ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "entities": [] }))
}

// ── Notifier tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_android_notifier() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(app_path("notifiers")))
        .and(body_json(json!({
            "name": "gcm",
            "provider": "google",
            "apiKey": "AIzaSy-test",
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    tokio_test::assert_ok!(client.create_notifier_for_android("gcm", "AIzaSy-test").await);
}

#[tokio::test]
async fn test_apple_notifier_uploads_certificate() {
    let (server, client) = setup().await;

    let mut cert = tempfile::Builder::new().suffix(".p12").tempfile().unwrap();
    cert.write_all(b"fake-p12-bytes").unwrap();

    Mock::given(method("POST"))
        .and(path(app_path("notifiers")))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_notifier_for_apple("ios-dev", "development", cert.path())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"p12Certificate\""));
    assert!(body.contains("fake-p12-bytes"));
    assert!(body.contains("development"));
    assert!(body.contains("apple"));
}

#[tokio::test]
async fn test_apple_notifier_missing_certificate() {
    let (server, client) = setup().await;

    let result = client
        .create_notifier_for_apple("ios-dev", "development", "/nonexistent/cert.p12")
        .await;

    assert!(
        matches!(result, Err(Error::Io { .. })),
        "expected Io error, got: {result:?}"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_and_delete_notifier() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(app_path("notifiers/gcm")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [{
                "uuid": "5f8e2a3c-1d4b-4c6e-9a7f-0b1c2d3e4f50",
                "type": "notifier",
                "name": "gcm",
                "provider": "google",
            }],
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(app_path("notifiers/gcm")))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let notifier: Notifier = client.get_notifier("gcm").await.unwrap().unwrap();
    assert_eq!(notifier.provider.as_deref(), Some("google"));
    client.delete_notifier("gcm").await.unwrap();
}

// ── Publishing tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_publish_to_all_devices() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(app_path("devices;ql=/notifications")))
        .and(body_json(json!({
            "payloads": {
                "ios-prod": { "aps": { "alert": "hello" } },
                "gcm": { "data": "hello" },
            },
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let notifications = [
        Notification::apple("ios-prod", "hello"),
        Notification::android("gcm", "hello"),
    ];
    client
        .publish_notification(&notifications, &NotificationRecipients::new(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_publish_scheduled_to_group_member() {
    let (server, client) = setup().await;

    let deliver = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
    let expire = Utc.with_ymd_and_hms(2026, 1, 2, 9, 0, 0).unwrap();

    Mock::given(method("POST"))
        .and(path(app_path("groups/ops/users/jdoe/notifications")))
        .and(body_json(json!({
            "payloads": { "ios-prod": { "aps": { "alert": "deploy", "sound": "chime" } } },
            "deliver": deliver.timestamp_millis(),
            "expire": expire.timestamp_millis(),
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let recipients = NotificationRecipients::new()
        .group_path("ops")
        .user_name("jdoe");
    let schedule = NotificationSchedule {
        deliver_at: Some(deliver),
        expire_at: Some(expire),
    };
    client
        .publish_notification(
            &[Notification::apple("ios-prod", "deploy").with_sound("chime")],
            &recipients,
            Some(&schedule),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancel_notification() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(app_path("notifications/7c4b1f0e")))
        .and(body_json(json!({ "canceled": true })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    client.cancel_notification("7c4b1f0e").await.unwrap();
}

// Notifications manager
//
// Notifier registration (Apple via multipart certificate upload, Android
// via a plain entity) and notification publishing / cancelling.

use std::path::Path;
use std::sync::Arc;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::Error;
use crate::managers::EntityManager;
use crate::models::{Notification, NotificationRecipients, NotificationSchedule};
use crate::request::RequestExecutor;

const NOTIFIERS: &str = "notifiers";
const NOTIFICATIONS: &str = "notifications";

#[derive(Debug)]
pub struct NotificationsManager {
    request: Arc<RequestExecutor>,
    entities: Arc<EntityManager>,
}

impl NotificationsManager {
    pub fn new(request: Arc<RequestExecutor>, entities: Arc<EntityManager>) -> Self {
        Self { request, entities }
    }

    /// Register an APNs notifier, uploading its `.p12` certificate.
    ///
    /// Multipart `POST /notifiers` with `name`, `provider=apple`,
    /// `environment` and the certificate as `p12Certificate`.
    pub async fn create_notifier_for_apple(
        &self,
        name: &str,
        environment: &str,
        p12_certificate: impl AsRef<Path>,
    ) -> Result<(), Error> {
        let cert_path = p12_certificate.as_ref();
        let bytes = tokio::fs::read(cert_path).await.map_err(|source| Error::Io {
            path: cert_path.display().to_string(),
            source,
        })?;
        let file_name = cert_path
            .file_name()
            .map_or_else(|| "certificate.p12".to_owned(), |n| n.to_string_lossy().into_owned());

        let form = Form::new()
            .text("name", name.to_owned())
            .text("provider", "apple")
            .text("environment", environment.to_owned())
            .part("p12Certificate", Part::bytes(bytes).file_name(file_name));

        debug!(name, environment, "creating apple notifier");
        self.request
            .execute_multipart(Method::POST, NOTIFIERS, form)
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Register a GCM notifier.
    ///
    /// `POST /notifiers` with `{"name", "provider": "google", "apiKey"}`.
    pub async fn create_notifier_for_android(
        &self,
        name: &str,
        api_key: &str,
    ) -> Result<(), Error> {
        debug!(name, "creating android notifier");
        let body = json!({
            "name": name,
            "provider": "google",
            "apiKey": api_key,
        });
        self.entities.create(NOTIFIERS, Some(&body)).await
    }

    /// Send `notifications` to `recipients`, optionally scheduled.
    ///
    /// `POST {recipients}/notifications` with one payload per notifier;
    /// `deliver` / `expire` are epoch milliseconds.
    pub async fn publish_notification(
        &self,
        notifications: &[Notification],
        recipients: &NotificationRecipients,
        schedule: Option<&NotificationSchedule>,
    ) -> Result<(), Error> {
        let payloads: Map<String, Value> = notifications
            .iter()
            .map(|n| (n.notifier_name().to_owned(), n.payload()))
            .collect();

        let mut body = Map::new();
        body.insert("payloads".into(), Value::Object(payloads));
        if let Some(schedule) = schedule {
            if let Some(deliver) = schedule.deliver_at {
                body.insert("deliver".into(), json!(deliver.timestamp_millis()));
            }
            if let Some(expire) = schedule.expire_at {
                body.insert("expire".into(), json!(expire.timestamp_millis()));
            }
        }

        let path = format!("{}/{NOTIFICATIONS}", recipients.build_query());
        debug!(%path, count = notifications.len(), "publishing notification");
        self.entities.create(&path, Some(&body)).await
    }

    /// Cancel a scheduled notification.
    ///
    /// `PUT /notifications/{id}` with `{"canceled": true}`.
    pub async fn cancel_notification(&self, notification_id: &str) -> Result<(), Error> {
        debug!(notification_id, "cancelling notification");
        self.entities
            .update(NOTIFICATIONS, notification_id, &json!({ "canceled": true }))
            .await
    }
}

// Notifier and notification endpoints

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Notification, NotificationRecipients, NotificationSchedule};

const NOTIFIERS: &str = "notifiers";

impl Client {
    pub async fn create_notifier_for_apple(
        &self,
        name: &str,
        environment: &str,
        p12_certificate: impl AsRef<Path>,
    ) -> Result<(), Error> {
        self.notifications()
            .create_notifier_for_apple(name, environment, p12_certificate)
            .await
    }

    pub async fn create_notifier_for_android(
        &self,
        name: &str,
        api_key: &str,
    ) -> Result<(), Error> {
        self.notifications()
            .create_notifier_for_android(name, api_key)
            .await
    }

    /// Fetch a notifier by name or uuid; `None` if there is no such notifier.
    pub async fn get_notifier<T: DeserializeOwned>(
        &self,
        identifier: &str,
    ) -> Result<Option<T>, Error> {
        let notifier = self.get_entity::<T>(NOTIFIERS, identifier).await?;
        Ok(notifier.map(|n| n.entity))
    }

    pub async fn delete_notifier(&self, name: &str) -> Result<(), Error> {
        self.delete_entity(NOTIFIERS, name).await
    }

    pub async fn publish_notification(
        &self,
        notifications: &[Notification],
        recipients: &NotificationRecipients,
        schedule: Option<&NotificationSchedule>,
    ) -> Result<(), Error> {
        self.notifications()
            .publish_notification(notifications, recipients, schedule)
            .await
    }

    pub async fn cancel_notification(&self, notification_id: &str) -> Result<(), Error> {
        self.notifications()
            .cancel_notification(notification_id)
            .await
    }
}

// Device endpoints

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::error::Error;
use crate::models::Identifiable;

const DEVICES: &str = "devices";

impl Client {
    /// Fetch a device by name or uuid; `None` if there is no such device.
    pub async fn get_device<T: DeserializeOwned>(
        &self,
        identifier: &str,
    ) -> Result<Option<T>, Error> {
        let device = self.get_entity::<T>(DEVICES, identifier).await?;
        Ok(device.map(|d| d.entity))
    }

    pub async fn create_device<T: Serialize + Sync>(&self, device: &T) -> Result<(), Error> {
        self.create_entity(DEVICES, Some(device)).await
    }

    /// Update a device addressed by its name.
    pub async fn update_device<T: Identifiable + Serialize + Sync>(
        &self,
        device: &T,
    ) -> Result<(), Error> {
        self.update_entity(DEVICES, device.identifier(), device).await
    }

    pub async fn delete_device(&self, identifier: &str) -> Result<(), Error> {
        self.delete_entity(DEVICES, identifier).await
    }
}

// User endpoints
//
// `users` collection, addressed by username, uuid, or email.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::error::Error;
use crate::models::Identifiable;

const USERS: &str = "users";

impl Client {
    /// Fetch a user; `None` if there is no such user.
    ///
    /// `GET /users/{identifier}`
    pub async fn get_user<T: DeserializeOwned>(
        &self,
        identifier: &str,
    ) -> Result<Option<T>, Error> {
        let user = self.get_entity::<T>(USERS, identifier).await?;
        Ok(user.map(|u| u.entity))
    }

    /// `POST /users`
    pub async fn create_user<T: Serialize + Sync>(&self, user: &T) -> Result<(), Error> {
        self.create_entity(USERS, Some(user)).await
    }

    /// Update a user addressed by its username.
    ///
    /// `PUT /users/{username}`
    pub async fn update_user<T: Identifiable + Serialize + Sync>(
        &self,
        user: &T,
    ) -> Result<(), Error> {
        self.update_entity(USERS, user.identifier(), user).await
    }

    /// `DELETE /users/{identifier}`
    pub async fn delete_user(&self, identifier: &str) -> Result<(), Error> {
        self.delete_entity(USERS, identifier).await
    }
}

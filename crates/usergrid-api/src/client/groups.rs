// Group endpoints
//
// `groups` collection, addressed by path or uuid, plus membership under
// `/groups/{group}/users/{user}`.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{GetResponse, Identifiable};
use crate::request::{NO_BODY, resource_path};

const GROUPS: &str = "groups";

impl Client {
    /// Fetch a group; `None` if there is no such group.
    ///
    /// `GET /groups/{identifier}`
    pub async fn get_group<T: DeserializeOwned>(
        &self,
        identifier: &str,
    ) -> Result<Option<T>, Error> {
        let group = self.get_entity::<T>(GROUPS, identifier).await?;
        Ok(group.map(|g| g.entity))
    }

    /// `POST /groups`
    pub async fn create_group<T: Serialize + Sync>(&self, group: &T) -> Result<(), Error> {
        self.create_entity(GROUPS, Some(group)).await
    }

    /// Update a group addressed by its path.
    ///
    /// `PUT /groups/{path}`
    pub async fn update_group<T: Identifiable + Serialize + Sync>(
        &self,
        group: &T,
    ) -> Result<(), Error> {
        self.update_entity(GROUPS, group.identifier(), group).await
    }

    /// `DELETE /groups/{path}`
    pub async fn delete_group(&self, path: &str) -> Result<(), Error> {
        self.delete_entity(GROUPS, path).await
    }

    /// Make `username` a member of `group`.
    ///
    /// `POST /groups/{group}/users/{username}`, no body.
    pub async fn add_user_to_group(&self, group: &str, username: &str) -> Result<(), Error> {
        let path = resource_path(&[GROUPS, group, "users", username]);
        self.create_entity(&path, NO_BODY).await
    }

    /// `DELETE /groups/{group}/users/{username}`
    pub async fn delete_user_from_group(&self, group: &str, username: &str) -> Result<(), Error> {
        let collection = resource_path(&[GROUPS, group, "users"]);
        self.delete_entity(&collection, username).await
    }

    /// Every member of `group`, payloads only.
    ///
    /// `GET /groups/{group}/users`
    pub async fn get_all_users_in_group<T: DeserializeOwned>(
        &self,
        group: &str,
    ) -> Result<Vec<T>, Error> {
        let path = resource_path(&[GROUPS, group, "users"]);
        debug!(group, "listing group members");
        let page: GetResponse<T> = self
            .request()
            .execute(Method::GET, &path, NO_BODY)
            .await?
            .into_json()?;
        Ok(page.entities)
    }
}

// Activity and feed endpoints
//
// Activities are posted into `/{users|groups}/{id}/activities`; feeds are
// read back from `/{users|groups}/{id}/feed`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::Client;
use crate::error::Error;
use crate::managers::DEFAULT_PAGE_SIZE;
use crate::models::Collection;
use crate::request::resource_path;

impl Client {
    /// `POST /users/{user}/activities`
    pub async fn post_activity<T: Serialize + Sync>(
        &self,
        user: &str,
        activity: &T,
    ) -> Result<(), Error> {
        let collection = resource_path(&["users", user, "activities"]);
        self.create_entity(&collection, Some(activity)).await
    }

    /// `POST /groups/{group}/activities`
    pub async fn post_activity_to_group<T: Serialize + Sync>(
        &self,
        group: &str,
        activity: &T,
    ) -> Result<(), Error> {
        let collection = resource_path(&["groups", group, "activities"]);
        self.create_entity(&collection, Some(activity)).await
    }

    /// Post as `user` to the followers they have within `group`.
    ///
    /// `POST /groups/{group}/users/{user}/activities`
    pub async fn post_activity_to_users_followers_in_group<T: Serialize + Sync>(
        &self,
        user: &str,
        group: &str,
        activity: &T,
    ) -> Result<(), Error> {
        let collection = resource_path(&["groups", group, "users", user, "activities"]);
        self.create_entity(&collection, Some(activity)).await
    }

    /// `GET /users/{user}/activities`
    pub async fn get_user_activities<T: DeserializeOwned>(
        &self,
        user: &str,
    ) -> Result<Collection<T>, Error> {
        let collection = resource_path(&["users", user, "activities"]);
        self.get_entities(&collection, DEFAULT_PAGE_SIZE, None).await
    }

    /// `GET /groups/{group}/activities`
    pub async fn get_group_activities<T: DeserializeOwned>(
        &self,
        group: &str,
    ) -> Result<Collection<T>, Error> {
        let collection = resource_path(&["groups", group, "activities"]);
        self.get_entities(&collection, DEFAULT_PAGE_SIZE, None).await
    }

    /// `GET /users/{user}/feed`
    pub async fn get_user_feed<T: DeserializeOwned>(
        &self,
        user: &str,
    ) -> Result<Collection<T>, Error> {
        let collection = resource_path(&["users", user, "feed"]);
        self.get_entities(&collection, DEFAULT_PAGE_SIZE, None).await
    }

    /// `GET /groups/{group}/feed`
    pub async fn get_group_feed<T: DeserializeOwned>(
        &self,
        group: &str,
    ) -> Result<Collection<T>, Error> {
        let collection = resource_path(&["groups", group, "feed"]);
        self.get_entities(&collection, DEFAULT_PAGE_SIZE, None).await
    }
}

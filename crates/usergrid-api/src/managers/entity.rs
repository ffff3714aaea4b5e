// Entity manager
//
// Generic CRUD and paged listing over named collections. Listing results
// carry their own `PageCursor`; the manager also remembers the last page
// listed per collection so callers can step with `list_next` /
// `list_previous` without threading cursors themselves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::models::{Collection, Entity, GetResponse, PageCursor};
use crate::request::{NO_BODY, RequestExecutor, resource_path};

/// Page size used when the caller doesn't pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// CRUD and listing for arbitrary collections.
///
/// The remembered cursors are last-call memory: one slot per collection,
/// overwritten by every `list` / `list_next` / `list_previous`. Concurrent
/// listing of the same collection through one manager is last-writer-wins.
#[derive(Debug)]
pub struct EntityManager {
    request: Arc<RequestExecutor>,
    cursors: Mutex<HashMap<String, PageCursor>>,
}

impl EntityManager {
    pub fn new(request: Arc<RequestExecutor>) -> Self {
        Self {
            request,
            cursors: Mutex::new(HashMap::new()),
        }
    }

    // ── CRUD ─────────────────────────────────────────────────────────

    /// Create an entity in `collection`.
    ///
    /// `POST /{collection}`. With `None` nothing is sent as body, which
    /// creates a bare addressable resource (e.g. a group membership).
    pub async fn create<B>(&self, collection: &str, entity: Option<&B>) -> Result<(), Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        debug!(collection, "creating entity");
        self.request
            .execute(Method::POST, collection, entity)
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Fetch one entity by uuid or natural key.
    ///
    /// `GET /{collection}/{identifier}`. A 404 is `Ok(None)`; every other
    /// non-success status is an error.
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        identifier: &str,
    ) -> Result<Option<Entity<T>>, Error> {
        let path = resource_path(&[collection, identifier]);
        debug!(collection, identifier, "fetching entity");

        let resp = self.request.execute(Method::GET, &path, NO_BODY).await?;
        if resp.status == StatusCode::NOT_FOUND {
            debug!(collection, identifier, "entity not found");
            return Ok(None);
        }

        let page: GetResponse<Entity<T>> = resp.into_json()?;
        Ok(page.entities.into_iter().next())
    }

    /// Replace an entity's fields.
    ///
    /// `PUT /{collection}/{identifier}`
    pub async fn update<B>(
        &self,
        collection: &str,
        identifier: &str,
        entity: &B,
    ) -> Result<(), Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        let path = resource_path(&[collection, identifier]);
        debug!(collection, identifier, "updating entity");
        self.request
            .execute(Method::PUT, &path, Some(entity))
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Delete an entity. Deleting one that is already gone is a 404 error.
    ///
    /// `DELETE /{collection}/{identifier}`
    pub async fn delete(&self, collection: &str, identifier: &str) -> Result<(), Error> {
        let path = resource_path(&[collection, identifier]);
        debug!(collection, identifier, "deleting entity");
        self.request
            .execute(Method::DELETE, &path, NO_BODY)
            .await?
            .error_for_status()?;
        Ok(())
    }

    // ── Listing ──────────────────────────────────────────────────────

    /// First page of `collection`, optionally filtered by a query.
    ///
    /// `GET /{collection}?limit={limit}&ql={query}`
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        limit: u32,
        query: Option<&str>,
    ) -> Result<Collection<T>, Error> {
        let page = self
            .fetch(PageCursor::first(collection, limit, query))
            .await?;
        self.remember(page.cursor());
        Ok(page)
    }

    /// Page after the last one listed for `collection`.
    ///
    /// Empty (not an error) when nothing was listed yet or the last page
    /// was the final one.
    pub async fn list_next<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Collection<T>, Error> {
        let remembered = self.recall(collection);
        match remembered.as_ref().and_then(PageCursor::forward) {
            Some(target) => {
                let page = self.fetch(target).await?;
                self.remember(page.cursor());
                Ok(page)
            }
            None => {
                debug!(collection, "no next page remembered");
                Ok(Self::nothing_from(collection, remembered.as_ref()))
            }
        }
    }

    /// Page before the last one listed for `collection`.
    ///
    /// Empty (not an error) when nothing was listed yet or the last page
    /// was the first one.
    pub async fn list_previous<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Collection<T>, Error> {
        let remembered = self.recall(collection);
        match remembered.as_ref().and_then(PageCursor::backward) {
            Some(target) => {
                let page = self.fetch(target).await?;
                self.remember(page.cursor());
                Ok(page)
            }
            None => {
                debug!(collection, "no previous page remembered");
                Ok(Self::nothing_from(collection, remembered.as_ref()))
            }
        }
    }

    /// Page after `cursor`. Leaves the remembered cursors untouched.
    pub async fn next_page<T: DeserializeOwned>(
        &self,
        cursor: &PageCursor,
    ) -> Result<Collection<T>, Error> {
        match cursor.forward() {
            Some(target) => self.fetch(target).await,
            None => {
                debug!(collection = cursor.collection(), "no next page");
                Ok(Self::exhausted(cursor))
            }
        }
    }

    /// Page before `cursor`. Leaves the remembered cursors untouched.
    pub async fn previous_page<T: DeserializeOwned>(
        &self,
        cursor: &PageCursor,
    ) -> Result<Collection<T>, Error> {
        match cursor.backward() {
            Some(target) => self.fetch(target).await,
            None => {
                debug!(collection = cursor.collection(), "no previous page");
                Ok(Self::exhausted(cursor))
            }
        }
    }

    /// The cursor remembered for `collection`, if any.
    pub fn remembered_cursor(&self, collection: &str) -> Option<PageCursor> {
        self.recall(collection)
    }

    async fn fetch<T: DeserializeOwned>(&self, cursor: PageCursor) -> Result<Collection<T>, Error> {
        let mut params = vec![("limit", cursor.limit().to_string())];
        if let Some(ql) = cursor.query() {
            params.push(("ql", ql.to_owned()));
        }
        if let Some(token) = cursor.position() {
            params.push(("cursor", token.to_owned()));
        }
        debug!(
            collection = cursor.collection(),
            page = cursor.page_index(),
            "listing entities"
        );

        let page: GetResponse<Entity<T>> = self
            .request
            .execute_with_params(Method::GET, cursor.collection(), &params, NO_BODY)
            .await?
            .into_json()?;

        Ok(Collection::new(page.entities, cursor.with_next(page.cursor)))
    }

    fn exhausted<T>(cursor: &PageCursor) -> Collection<T> {
        Collection::empty(cursor.collection(), cursor.limit(), cursor.query())
    }

    fn nothing_from<T>(collection: &str, remembered: Option<&PageCursor>) -> Collection<T> {
        remembered.map_or_else(
            || Collection::empty(collection, DEFAULT_PAGE_SIZE, None),
            Self::exhausted,
        )
    }

    // ── Cursor memory ────────────────────────────────────────────────

    fn remember(&self, cursor: &PageCursor) {
        self.cursors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cursor.collection().to_owned(), cursor.clone());
    }

    fn recall(&self, collection: &str) -> Option<PageCursor> {
        self.cursors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .cloned()
    }
}

// Client facade
//
// Public entry point. Owns the session and the four managers; the
// domain-specific methods (users, groups, devices, activities, notifiers)
// live in sibling files as inherent impls and only shape collection names
// and paths before delegating.

mod activities;
mod devices;
mod groups;
mod notifications;
mod users;

use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::managers::{
    AuthType, AuthenticationManager, ConnectionManager, EntityManager, NotificationsManager,
};
use crate::models::{Collection, Connectable, Entity, PageCursor, RawEntity};
use crate::request::RequestExecutor;
use crate::session::{ClientConfig, Session};

/// Typed client for one Usergrid organization/application.
///
/// Cheap to share behind an `Arc`. A single instance is safe to use from
/// several tasks, but a `login` racing in-flight requests may or may not
/// be seen by them, and remembered list cursors are last-writer-wins.
#[derive(Debug)]
pub struct Client {
    request: Arc<RequestExecutor>,
    auth: AuthenticationManager,
    entities: Arc<EntityManager>,
    connections: ConnectionManager,
    notifications: NotificationsManager,
}

impl Client {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client, including its HTTP transport, from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let session = Arc::new(Session::from_config(config)?);
        let request = RequestExecutor::new(session, &config.transport)?;
        Ok(Self::from_executor(Arc::new(request)))
    }

    /// Build a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, session: Session) -> Self {
        let request = RequestExecutor::with_client(http, Arc::new(session));
        Self::from_executor(Arc::new(request))
    }

    fn from_executor(request: Arc<RequestExecutor>) -> Self {
        let entities = Arc::new(EntityManager::new(Arc::clone(&request)));
        Self {
            auth: AuthenticationManager::new(Arc::clone(&request)),
            connections: ConnectionManager::new(Arc::clone(&request)),
            notifications: NotificationsManager::new(Arc::clone(&request), Arc::clone(&entities)),
            entities,
            request,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        self.request.session()
    }

    pub fn request(&self) -> &RequestExecutor {
        &self.request
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn notifications(&self) -> &NotificationsManager {
        &self.notifications
    }

    // ── Authentication ───────────────────────────────────────────────

    pub async fn login(
        &self,
        login_id: &str,
        secret: &SecretString,
        auth_type: AuthType,
    ) -> Result<(), Error> {
        self.auth.login(login_id, secret, auth_type).await
    }

    pub async fn change_password(
        &self,
        username: &str,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<(), Error> {
        self.auth
            .change_password(username, old_password, new_password)
            .await
    }

    // ── Generic entities ─────────────────────────────────────────────

    pub async fn create_entity<B>(&self, collection: &str, entity: Option<&B>) -> Result<(), Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.entities.create(collection, entity).await
    }

    pub async fn get_entity<T: DeserializeOwned>(
        &self,
        collection: &str,
        identifier: &str,
    ) -> Result<Option<Entity<T>>, Error> {
        self.entities.get(collection, identifier).await
    }

    pub async fn update_entity<B>(
        &self,
        collection: &str,
        identifier: &str,
        entity: &B,
    ) -> Result<(), Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.entities.update(collection, identifier, entity).await
    }

    pub async fn delete_entity(&self, collection: &str, identifier: &str) -> Result<(), Error> {
        self.entities.delete(collection, identifier).await
    }

    pub async fn get_entities<T: DeserializeOwned>(
        &self,
        collection: &str,
        limit: u32,
        query: Option<&str>,
    ) -> Result<Collection<T>, Error> {
        self.entities.list(collection, limit, query).await
    }

    pub async fn get_next_entities<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Collection<T>, Error> {
        self.entities.list_next(collection).await
    }

    pub async fn get_previous_entities<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Collection<T>, Error> {
        self.entities.list_previous(collection).await
    }

    /// Page after `cursor`, without touching the remembered cursors.
    pub async fn next_page<T: DeserializeOwned>(
        &self,
        cursor: &PageCursor,
    ) -> Result<Collection<T>, Error> {
        self.entities.next_page(cursor).await
    }

    /// Page before `cursor`, without touching the remembered cursors.
    pub async fn previous_page<T: DeserializeOwned>(
        &self,
        cursor: &PageCursor,
    ) -> Result<Collection<T>, Error> {
        self.entities.previous_page(cursor).await
    }

    // ── Connections ──────────────────────────────────────────────────

    pub async fn create_connection<A, B>(
        &self,
        connector: &A,
        connectee: &B,
        connection: &str,
    ) -> Result<(), Error>
    where
        A: Connectable + ?Sized,
        B: Connectable + ?Sized,
    {
        self.connections
            .create(connector, connectee, connection)
            .await
    }

    pub async fn get_connections<A>(
        &self,
        connector: &A,
        connection: &str,
    ) -> Result<Vec<RawEntity>, Error>
    where
        A: Connectable + ?Sized,
    {
        self.connections.get(connector, connection).await
    }

    pub async fn get_typed_connections<T, A>(
        &self,
        connector: &A,
        connection: &str,
    ) -> Result<Vec<Entity<T>>, Error>
    where
        T: DeserializeOwned,
        A: Connectable + ?Sized,
    {
        self.connections.get_typed(connector, connection).await
    }

    pub async fn delete_connection<A, B>(
        &self,
        connector: &A,
        connectee: &B,
        connection: &str,
    ) -> Result<(), Error>
    where
        A: Connectable + ?Sized,
        B: Connectable + ?Sized,
    {
        self.connections
            .delete(connector, connectee, connection)
            .await
    }
}

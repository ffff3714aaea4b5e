// Connection manager
//
// Directed, named edges between two entities:
// `/{connector type}/{connector id}/{connection}/{connectee id}`.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::models::{Connectable, Entity, GetResponse, RawEntity};
use crate::request::{NO_BODY, RequestExecutor, resource_path};

/// Create, read, and delete connections.
///
/// Connector and connectee are not interchangeable: an edge is identified
/// by both endpoints plus its name, in that direction.
#[derive(Debug)]
pub struct ConnectionManager {
    request: Arc<RequestExecutor>,
}

impl ConnectionManager {
    pub fn new(request: Arc<RequestExecutor>) -> Self {
        Self { request }
    }

    /// Connect `connector` to `connectee` under `connection` (e.g. `likes`).
    ///
    /// `POST /{connectorType}/{connectorId}/{connection}/{connecteeId}`, no body.
    pub async fn create<A, B>(
        &self,
        connector: &A,
        connectee: &B,
        connection: &str,
    ) -> Result<(), Error>
    where
        A: Connectable + ?Sized,
        B: Connectable + ?Sized,
    {
        let path = edge_path(connector, connection, connectee);
        debug!(%path, "creating connection");
        self.request
            .execute(Method::POST, &path, NO_BODY)
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Entities `connector` points at through `connection`, untyped.
    ///
    /// `GET /{connectorType}/{connectorId}/{connection}`
    pub async fn get<A>(&self, connector: &A, connection: &str) -> Result<Vec<RawEntity>, Error>
    where
        A: Connectable + ?Sized,
    {
        let path = resource_path(&[
            connector.entity_type(),
            &connector.entity_id(),
            connection,
        ]);
        debug!(%path, "fetching connections");

        let page: GetResponse<RawEntity> = self
            .request
            .execute(Method::GET, &path, NO_BODY)
            .await?
            .into_json()?;
        Ok(page.entities)
    }

    /// Same as [`get`](Self::get), deserializing every connectee as `T`.
    pub async fn get_typed<T, A>(
        &self,
        connector: &A,
        connection: &str,
    ) -> Result<Vec<Entity<T>>, Error>
    where
        T: DeserializeOwned,
        A: Connectable + ?Sized,
    {
        self.get(connector, connection)
            .await?
            .into_iter()
            .map(RawEntity::into_typed::<T>)
            .collect()
    }

    /// Remove the `connection` edge from `connector` to `connectee`.
    ///
    /// `DELETE /{connectorType}/{connectorId}/{connection}/{connecteeId}`
    pub async fn delete<A, B>(
        &self,
        connector: &A,
        connectee: &B,
        connection: &str,
    ) -> Result<(), Error>
    where
        A: Connectable + ?Sized,
        B: Connectable + ?Sized,
    {
        let path = edge_path(connector, connection, connectee);
        debug!(%path, "deleting connection");
        self.request
            .execute(Method::DELETE, &path, NO_BODY)
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn edge_path<A, B>(connector: &A, connection: &str, connectee: &B) -> String
where
    A: Connectable + ?Sized,
    B: Connectable + ?Sized,
{
    resource_path(&[
        connector.entity_type(),
        &connector.entity_id(),
        connection,
        &connectee.entity_id(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityRef;

    #[test]
    fn edge_path_is_directional() {
        let jdoe = EntityRef::new("users", "jdoe");
        let cafe = EntityRef::new("restaurants", "cafe-azul");

        assert_eq!(edge_path(&jdoe, "likes", &cafe), "users/jdoe/likes/cafe-azul");
        assert_eq!(
            edge_path(&cafe, "likes", &jdoe),
            "restaurants/cafe-azul/likes/jdoe"
        );
    }
}

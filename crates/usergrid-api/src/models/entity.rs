// Entity envelope and addressing traits
//
// Usergrid returns entities as flat JSON objects: service metadata (`uuid`,
// `type`, `created`, `modified`) sits next to the caller's own fields. The
// envelope splits those apart with `#[serde(flatten)]`.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// A payload `T` plus the metadata the service assigns to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity<T> {
    pub uuid: Uuid,
    /// Entity type, e.g. `user` or `group`.
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub entity: T,
}

/// An entity whose payload has not been given a Rust type.
pub type RawEntity = Entity<serde_json::Map<String, serde_json::Value>>;

impl<T> Entity<T> {
    /// Borrow the payload.
    pub fn payload(&self) -> &T {
        &self.entity
    }

    /// Drop the metadata and keep the payload.
    pub fn into_payload(self) -> T {
        self.entity
    }
}

impl RawEntity {
    /// Deserialize the untyped payload as `T`, keeping the metadata.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Entity<T>, Error> {
        let value = serde_json::Value::Object(self.entity);
        let entity = serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: value.to_string(),
        })?;
        Ok(Entity {
            uuid: self.uuid,
            entity_type: self.entity_type,
            created: self.created,
            modified: self.modified,
            entity,
        })
    }

    /// Look up a payload field by name.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.entity.get(field)
    }
}

// ── Addressing ───────────────────────────────────────────────────────

/// A domain type that has a collection-specific natural key.
///
/// The service resolves the natural key and the uuid to the same resource,
/// so either can address it.
pub trait Identifiable {
    /// The natural key: username, group path, device name, notifier name.
    fn identifier(&self) -> &str;
}

impl<T: Identifiable> Identifiable for Entity<T> {
    fn identifier(&self) -> &str {
        self.entity.identifier()
    }
}

/// Something that can sit at either end of a connection.
pub trait Connectable {
    /// Collection or type segment used in the connection path.
    fn entity_type(&self) -> &str;
    /// Uuid or natural key used in the connection path.
    fn entity_id(&self) -> Cow<'_, str>;
}

impl<T> Connectable for Entity<T> {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn entity_id(&self) -> Cow<'_, str> {
        Cow::Owned(self.uuid.to_string())
    }
}

/// A bare `(type, id)` reference to an entity that need not be fetched first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub entity_type: String,
    pub id: String,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

impl Connectable for EntityRef {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn entity_id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::User;

    #[test]
    fn flat_json_splits_into_metadata_and_payload() {
        let uuid = Uuid::new_v4();
        let raw = json!({
            "uuid": uuid,
            "type": "user",
            "created": 1_365_447_542_222_i64,
            "modified": 1_365_447_542_222_i64,
            "username": "jdoe",
            "email": "jdoe@example.com",
            "nickname": "J"
        });

        let entity: Entity<User> = serde_json::from_value(raw).unwrap();

        assert_eq!(entity.uuid, uuid);
        assert_eq!(entity.entity_type, "user");
        assert_eq!(
            entity.created.unwrap().timestamp_millis(),
            1_365_447_542_222
        );
        assert_eq!(entity.entity.username, "jdoe");
        assert_eq!(entity.entity.email.as_deref(), Some("jdoe@example.com"));
        assert_eq!(entity.entity.extra.get("nickname"), Some(&json!("J")));
        assert_eq!(entity.identifier(), "jdoe");
    }

    #[test]
    fn raw_entity_converts_to_typed() {
        let uuid = Uuid::new_v4();
        let raw: RawEntity = serde_json::from_value(json!({
            "uuid": uuid,
            "type": "user",
            "username": "jdoe"
        }))
        .unwrap();
        assert_eq!(raw.get("username"), Some(&json!("jdoe")));

        let typed: Entity<User> = raw.into_typed().unwrap();
        assert_eq!(typed.uuid, uuid);
        assert!(typed.created.is_none());
        assert_eq!(typed.entity.username, "jdoe");
    }

    #[test]
    fn raw_entity_with_wrong_shape_fails_typed_conversion() {
        let raw: RawEntity = serde_json::from_value(json!({
            "uuid": Uuid::new_v4(),
            "type": "user",
            "name": "no username here"
        }))
        .unwrap();
        let err = raw.into_typed::<User>().unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn connectable_paths() {
        let by_ref = EntityRef::new("users", "jdoe");
        assert_eq!(by_ref.entity_type(), "users");
        assert_eq!(by_ref.entity_id(), "jdoe");

        let uuid = Uuid::new_v4();
        let entity: RawEntity =
            serde_json::from_value(json!({ "uuid": uuid, "type": "restaurant" })).unwrap();
        assert_eq!(entity.entity_type(), "restaurant");
        assert_eq!(entity.entity_id(), uuid.to_string());
    }
}

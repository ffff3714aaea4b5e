// usergrid-api: Async Rust client for the Usergrid BaaS REST API
//
// One `Client` per organization/application. Entities, connections,
// authentication, and push notifications are handled by managers that
// share a single `RequestExecutor`; the client adds the domain-specific
// shortcuts (users, groups, devices, activities, notifiers) on top.

pub mod client;
pub mod error;
pub mod managers;
pub mod models;
pub mod request;
pub mod session;
pub mod transport;

pub use client::Client;
pub use error::Error;
pub use managers::{
    AuthType, AuthenticationManager, ConnectionManager, DEFAULT_PAGE_SIZE, EntityManager,
    NotificationsManager,
};
pub use models::{
    Activity, Actor, Collection, Connectable, Device, Entity, EntityRef, Group, Identifiable,
    Notification, NotificationRecipients, NotificationSchedule, Notifier, PageCursor, RawEntity,
    User,
};
pub use request::{NO_BODY, RawResponse, RequestExecutor};
pub use session::{ClientConfig, DEFAULT_BASE_URL, Session};
pub use transport::{TlsMode, TransportConfig};

// Resource managers
//
// Each manager is a thin layer over the shared `RequestExecutor`: it picks
// the HTTP method and relative path, and decides how the response is read.

pub mod auth;
pub mod connection;
pub mod entity;
pub mod notifications;

pub use auth::{AuthType, AuthenticationManager};
pub use connection::ConnectionManager;
pub use entity::{DEFAULT_PAGE_SIZE, EntityManager};
pub use notifications::NotificationsManager;

// Usergrid wire models
//
// Entity envelopes, collection pages, built-in domain types, and push
// notification payloads.

pub mod collection;
pub mod domain;
pub mod entity;
pub mod notification;

pub use collection::{Collection, PageCursor};
pub(crate) use collection::GetResponse;
pub use domain::{Activity, Actor, Device, Group, Notifier, User};
pub use entity::{Connectable, Entity, EntityRef, Identifiable, RawEntity};
pub use notification::{Notification, NotificationRecipients, NotificationSchedule};

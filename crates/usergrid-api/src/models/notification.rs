// Push notification payloads, recipients, and scheduling

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use uuid::Uuid;

// ── Notifications ────────────────────────────────────────────────────

/// One provider-specific message, delivered through the named notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Apple {
        notifier_name: String,
        message: String,
        sound: Option<String>,
    },
    Android {
        notifier_name: String,
        data: String,
    },
}

impl Notification {
    pub fn apple(notifier_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Apple {
            notifier_name: notifier_name.into(),
            message: message.into(),
            sound: None,
        }
    }

    pub fn android(notifier_name: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Android {
            notifier_name: notifier_name.into(),
            data: data.into(),
        }
    }

    /// Attach a sound to an Apple notification; no-op for Android.
    pub fn with_sound(self, sound: impl Into<String>) -> Self {
        match self {
            Self::Apple {
                notifier_name,
                message,
                ..
            } => Self::Apple {
                notifier_name,
                message,
                sound: Some(sound.into()),
            },
            other @ Self::Android { .. } => other,
        }
    }

    pub fn notifier_name(&self) -> &str {
        match self {
            Self::Apple { notifier_name, .. } | Self::Android { notifier_name, .. } => {
                notifier_name
            }
        }
    }

    /// The per-notifier payload in the provider's format.
    pub fn payload(&self) -> Value {
        match self {
            Self::Apple { message, sound, .. } => {
                let mut aps = Map::new();
                aps.insert("alert".into(), Value::String(message.clone()));
                if let Some(sound) = sound {
                    aps.insert("sound".into(), Value::String(sound.clone()));
                }
                json!({ "aps": aps })
            }
            Self::Android { data, .. } => json!({ "data": data }),
        }
    }
}

// ── Scheduling ───────────────────────────────────────────────────────

/// When to deliver a notification and when to give up on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationSchedule {
    pub deliver_at: Option<DateTime<Utc>>,
    pub expire_at: Option<DateTime<Utc>>,
}

// ── Recipients ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Id(String),
    Query(String),
}

impl Target {
    fn segment(&self, collection: &str) -> String {
        match self {
            Self::Id(id) => format!("/{collection}/{id}"),
            Self::Query(ql) => format!("/{collection};ql={ql}"),
        }
    }
}

/// Which devices a notification goes to.
///
/// Segments nest as groups → users → devices, so a group plus a device
/// query targets matching devices of that group's users. With nothing
/// selected, every device in the application is targeted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationRecipients {
    group: Option<Target>,
    user: Option<Target>,
    device: Option<Target>,
}

impl NotificationRecipients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_path(mut self, path: impl Into<String>) -> Self {
        self.group = Some(Target::Id(path.into()));
        self
    }

    pub fn group_query(mut self, ql: impl Into<String>) -> Self {
        self.group = Some(Target::Query(ql.into()));
        self
    }

    pub fn user_name(mut self, username: impl Into<String>) -> Self {
        self.user = Some(Target::Id(username.into()));
        self
    }

    pub fn user_uuid(mut self, uuid: Uuid) -> Self {
        self.user = Some(Target::Id(uuid.to_string()));
        self
    }

    pub fn user_query(mut self, ql: impl Into<String>) -> Self {
        self.user = Some(Target::Query(ql.into()));
        self
    }

    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device = Some(Target::Id(name.into()));
        self
    }

    pub fn device_query(mut self, ql: impl Into<String>) -> Self {
        self.device = Some(Target::Query(ql.into()));
        self
    }

    /// Resource path selecting the recipients, e.g. `/groups/ops/users;ql=...`.
    pub fn build_query(&self) -> String {
        let path: String = [
            self.group.as_ref().map(|t| t.segment("groups")),
            self.user.as_ref().map(|t| t.segment("users")),
            self.device.as_ref().map(|t| t.segment("devices")),
        ]
        .into_iter()
        .flatten()
        .collect();

        if path.is_empty() {
            "/devices;ql=".to_owned()
        } else {
            path
        }
    }
}

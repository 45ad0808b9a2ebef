//! Messages the backend keeps for each user, such as permit assignments

use chrono::{DateTime, Utc};

use crate::id::DbId;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct Notification {
    pub id: DbId,
    #[serde(default)]
    pub notification_type: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub permit: Option<DbId>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// The type as sent with underscores shown as spaces
    pub fn type_label(&self) -> String {
        self.notification_type.replace('_', " ")
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnreadCount {
    pub unread_count: u64,
}

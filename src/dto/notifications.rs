use serde::{Deserialize, Serialize};

use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::types::format_timestamp;
use crate::pagination::RawListParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: String,
    pub ticket_id: Option<String>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub read_at: Option<String>,
    pub created_at: String,
}

impl From<Notification> for NotificationDto {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            ticket_id: notification.ticket_id.map(|id| id.to_string()),
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            read_at: notification.read_at.map(format_timestamp),
            created_at: format_timestamp(notification.created_at),
        }
    }
}

/// Query string of `GET /notifications`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListParams {
    #[serde(flatten)]
    pub list: RawListParams,
    pub unread_only: Option<String>,
}

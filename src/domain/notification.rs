use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    NotificationBody, NotificationId, NotificationTitle, OrgId, TicketId, format_timestamp,
    string_enum,
};
use crate::pagination::{Keyed, SortKey, SortValue, SortValueKind};

string_enum!(
    /// What triggered a notification.
    NotificationKind {
        TicketAssigned => "ticket_assigned",
        TicketUpdated => "ticket_updated",
        CustomerReply => "customer_reply",
        Mention => "mention",
        System => "system",
    }
);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub org_id: OrgId,
    /// Cleared when the referenced ticket is deleted.
    pub ticket_id: Option<TicketId>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewNotification {
    pub org_id: OrgId,
    pub ticket_id: Option<TicketId>,
    pub kind: NotificationKind,
    pub title: NotificationTitle,
    pub body: Option<NotificationBody>,
}

impl NewNotification {
    #[must_use]
    pub fn new(
        org_id: OrgId,
        ticket_id: Option<TicketId>,
        kind: NotificationKind,
        title: NotificationTitle,
        body: Option<NotificationBody>,
    ) -> Self {
        Self {
            org_id,
            ticket_id,
            kind,
            title,
            body,
        }
    }
}

/// Notifications are listed newest first only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationSort {
    CreatedAt,
}

impl SortKey for NotificationSort {
    const DEFAULT: Self = NotificationSort::CreatedAt;

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createdAt" | "created_at" => Some(NotificationSort::CreatedAt),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        "createdAt"
    }

    fn column(&self) -> &'static str {
        "created_at"
    }

    fn kind(&self) -> SortValueKind {
        SortValueKind::Timestamp
    }
}

impl Keyed<NotificationSort> for Notification {
    fn sort_value(&self, _sort: NotificationSort) -> SortValue {
        format_timestamp(self.created_at).into()
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::notification::{
    NewNotification as DomainNewNotification, Notification as DomainNotification,
};
use crate::domain::types::{NotificationId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::notification::Notification`].
pub struct Notification {
    pub id: String,
    pub org_id: String,
    pub ticket_id: Option<String>,
    pub kind: String,
    pub title: String,
    pub body: Option<String>,
    pub read_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotification<'a> {
    pub id: String,
    pub org_id: String,
    pub ticket_id: Option<String>,
    pub kind: &'static str,
    pub title: &'a str,
    pub body: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Notification> for DomainNotification {
    type Error = TypeConstraintError;

    fn try_from(notification: Notification) -> Result<Self, Self::Error> {
        Ok(Self {
            id: notification.id.try_into()?,
            org_id: notification.org_id.try_into()?,
            ticket_id: notification.ticket_id.map(TryInto::try_into).transpose()?,
            kind: notification.kind.parse()?,
            title: notification.title,
            body: notification.body,
            read_at: notification.read_at,
            created_at: notification.created_at,
        })
    }
}

impl<'a> NewNotification<'a> {
    pub fn from_domain(notification: &'a DomainNewNotification, now: NaiveDateTime) -> Self {
        Self {
            id: NotificationId::new().to_string(),
            org_id: notification.org_id.to_string(),
            ticket_id: notification.ticket_id.map(|id| id.to_string()),
            kind: notification.kind.as_str(),
            title: notification.title.as_str(),
            body: notification.body.as_ref().map(|b| b.as_str()),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationKind;
    use crate::domain::types::{OrgId, now};

    #[test]
    fn detached_notification_round_trips() {
        let row = Notification {
            id: NotificationId::new().to_string(),
            org_id: OrgId::new().to_string(),
            ticket_id: None,
            kind: "customer_reply".to_string(),
            title: "New reply".to_string(),
            body: None,
            read_at: None,
            created_at: now(),
        };
        let notification = DomainNotification::try_from(row).unwrap();
        assert_eq!(notification.kind, NotificationKind::CustomerReply);
        assert!(notification.ticket_id.is_none());
    }
}

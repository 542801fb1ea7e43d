use serde::Deserialize;
use validator::Validate;

use crate::domain::notification::{NewNotification, NotificationKind};
use crate::domain::types::{NotificationBody, NotificationTitle, OrgId, TicketId};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Body of `POST /notifications`.
pub struct CreateNotificationForm {
    pub ticket_id: Option<String>,
    pub kind: NotificationKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Body of `PATCH /notifications/{id}`.
pub struct UpdateNotificationForm {
    pub read: bool,
}

impl CreateNotificationForm {
    pub fn into_domain(self, org_id: OrgId) -> Result<NewNotification, FormError> {
        self.validate()?;
        let ticket_id = non_blank(self.ticket_id)
            .map(|id| id.parse::<TicketId>())
            .transpose()
            .map_err(FormError::field("ticketId"))?;
        Ok(NewNotification::new(
            org_id,
            ticket_id,
            self.kind,
            NotificationTitle::new(self.title).map_err(FormError::field("title"))?,
            non_blank(self.body)
                .map(NotificationBody::new)
                .transpose()
                .map_err(FormError::field("body"))?,
        ))
    }
}

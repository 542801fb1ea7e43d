use serde::Deserialize;
use validator::Validate;

use crate::domain::ticket::{NewTicket, Sentiment, TicketPriority, TicketStatus, UpdateTicket};
use crate::domain::types::{
    AgentEmail, AiCategory, AiSummary, CustomerId, OrgId, TicketDescription, TicketSubject,
    parse_timestamp,
};
use crate::forms::{FormError, deserialize_some, non_blank, nullable_patch};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Body of `POST /tickets`.
pub struct CreateTicketForm {
    pub customer_id: String,
    #[validate(length(min = 2, max = 200))]
    pub subject: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    #[validate(email)]
    pub assignee_email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Body of `PATCH /tickets/{id}`.
pub struct UpdateTicketForm {
    #[validate(length(min = 2, max = 200))]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub assignee_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub ai_summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub ai_category: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub ai_sentiment: Option<Option<Sentiment>>,
    /// RFC 3339 timestamp, or `null` to restore the ticket.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub archived_at: Option<Option<String>>,
}

impl CreateTicketForm {
    pub fn into_domain(self, org_id: OrgId) -> Result<NewTicket, FormError> {
        self.validate()?;
        let customer_id: CustomerId = self
            .customer_id
            .parse()
            .map_err(FormError::field("customerId"))?;
        let mut ticket = NewTicket::new(
            org_id,
            customer_id,
            TicketSubject::new(self.subject).map_err(FormError::field("subject"))?,
        );
        ticket.description = non_blank(self.description)
            .map(TicketDescription::new)
            .transpose()
            .map_err(FormError::field("description"))?;
        ticket.assignee_email = non_blank(self.assignee_email)
            .map(AgentEmail::new)
            .transpose()
            .map_err(FormError::field("assigneeEmail"))?;
        if let Some(status) = self.status {
            ticket.status = status;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        Ok(ticket)
    }
}

impl UpdateTicketForm {
    pub fn into_domain(self) -> Result<UpdateTicket, FormError> {
        self.validate()?;
        let archived_at = match self.archived_at {
            None => None,
            Some(None) => Some(None),
            Some(Some(text)) => Some(Some(
                parse_timestamp(text.trim()).map_err(FormError::field("archivedAt"))?,
            )),
        };
        let updates = UpdateTicket {
            subject: self
                .subject
                .map(TicketSubject::new)
                .transpose()
                .map_err(FormError::field("subject"))?,
            description: nullable_patch(self.description, "description", TicketDescription::new)?,
            status: self.status,
            priority: self.priority,
            assignee_email: nullable_patch(self.assignee_email, "assigneeEmail", AgentEmail::new)?,
            ai_summary: nullable_patch(self.ai_summary, "aiSummary", AiSummary::new)?,
            ai_category: nullable_patch(self.ai_category, "aiCategory", AiCategory::new)?,
            ai_sentiment: self.ai_sentiment,
            archived_at,
        };
        if updates.is_empty() {
            return Err(FormError::EmptyUpdate);
        }
        Ok(updates)
    }
}

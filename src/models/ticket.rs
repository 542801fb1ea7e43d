use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::ticket::{
    NewTicket as DomainNewTicket, Ticket as DomainTicket, UpdateTicket as DomainUpdateTicket,
};
use crate::domain::types::{TicketId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::tickets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::ticket::Ticket`].
pub struct Ticket {
    pub id: String,
    pub org_id: String,
    pub customer_id: String,
    pub subject: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub assignee_email: Option<String>,
    pub ai_summary: Option<String>,
    pub ai_category: Option<String>,
    pub ai_sentiment: Option<String>,
    pub archived_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tickets)]
pub struct NewTicket<'a> {
    pub id: String,
    pub org_id: String,
    pub customer_id: String,
    pub subject: &'a str,
    pub description: Option<&'a str>,
    pub status: &'static str,
    pub priority: &'static str,
    pub assignee_email: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::tickets)]
pub struct UpdateTicket<'a> {
    pub subject: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub status: Option<&'static str>,
    pub priority: Option<&'static str>,
    pub assignee_email: Option<Option<&'a str>>,
    pub ai_summary: Option<Option<&'a str>>,
    pub ai_category: Option<Option<&'a str>>,
    pub ai_sentiment: Option<Option<&'static str>>,
    pub archived_at: Option<Option<NaiveDateTime>>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Ticket> for DomainTicket {
    type Error = TypeConstraintError;

    fn try_from(ticket: Ticket) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ticket.id.try_into()?,
            org_id: ticket.org_id.try_into()?,
            customer_id: ticket.customer_id.try_into()?,
            subject: ticket.subject,
            description: ticket.description,
            status: ticket.status.parse()?,
            priority: ticket.priority.parse()?,
            assignee_email: ticket.assignee_email,
            ai_summary: ticket.ai_summary,
            ai_category: ticket.ai_category,
            ai_sentiment: ticket.ai_sentiment.map(|s| s.parse()).transpose()?,
            archived_at: ticket.archived_at,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        })
    }
}

impl<'a> NewTicket<'a> {
    pub fn from_domain(ticket: &'a DomainNewTicket, now: NaiveDateTime) -> Self {
        Self {
            id: TicketId::new().to_string(),
            org_id: ticket.org_id.to_string(),
            customer_id: ticket.customer_id.to_string(),
            subject: ticket.subject.as_str(),
            description: ticket.description.as_ref().map(|d| d.as_str()),
            status: ticket.status.as_str(),
            priority: ticket.priority.as_str(),
            assignee_email: ticket.assignee_email.as_ref().map(|e| e.as_str()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateTicket<'a> {
    pub fn from_domain(updates: &'a DomainUpdateTicket, now: NaiveDateTime) -> Self {
        Self {
            subject: updates.subject.as_ref().map(|s| s.as_str()),
            description: updates
                .description
                .as_ref()
                .map(|d| d.as_ref().map(|d| d.as_str())),
            status: updates.status.map(|s| s.as_str()),
            priority: updates.priority.map(|p| p.as_str()),
            assignee_email: updates
                .assignee_email
                .as_ref()
                .map(|e| e.as_ref().map(|e| e.as_str())),
            ai_summary: updates
                .ai_summary
                .as_ref()
                .map(|s| s.as_ref().map(|s| s.as_str())),
            ai_category: updates
                .ai_category
                .as_ref()
                .map(|c| c.as_ref().map(|c| c.as_str())),
            ai_sentiment: updates.ai_sentiment.map(|s| s.map(|s| s.as_str())),
            archived_at: updates.archived_at,
            updated_at: now,
        }
    }
}

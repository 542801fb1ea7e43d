use serde::{Deserialize, Serialize};

use crate::domain::ticket::{Sentiment, Ticket, TicketAiMetadata, TicketPriority, TicketStatus};
use crate::domain::types::format_timestamp;
use crate::pagination::RawListParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    pub id: String,
    pub customer_id: String,
    pub subject: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee_email: Option<String>,
    pub ai_summary: Option<String>,
    pub ai_category: Option<String>,
    pub ai_sentiment: Option<Sentiment>,
    pub archived_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Ticket> for TicketDto {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            customer_id: ticket.customer_id.to_string(),
            subject: ticket.subject,
            description: ticket.description,
            status: ticket.status,
            priority: ticket.priority,
            assignee_email: ticket.assignee_email,
            ai_summary: ticket.ai_summary,
            ai_category: ticket.ai_category,
            ai_sentiment: ticket.ai_sentiment,
            archived_at: ticket.archived_at.map(format_timestamp),
            created_at: format_timestamp(ticket.created_at),
            updated_at: format_timestamp(ticket.updated_at),
        }
    }
}

/// Response of `GET /tickets/{id}/ai`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAiMetadataDto {
    pub ticket_id: String,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl From<TicketAiMetadata> for TicketAiMetadataDto {
    fn from(metadata: TicketAiMetadata) -> Self {
        Self {
            ticket_id: metadata.ticket_id.to_string(),
            summary: metadata.summary,
            category: metadata.category,
            sentiment: metadata.sentiment,
        }
    }
}

/// Query string of `GET /tickets`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListParams {
    #[serde(flatten)]
    pub list: RawListParams,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub customer_id: Option<String>,
    pub archived: Option<String>,
}

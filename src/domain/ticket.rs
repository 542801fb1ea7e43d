use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AgentEmail, AiCategory, AiSummary, CustomerId, OrgId, TicketDescription, TicketId,
    TicketSubject, format_timestamp, string_enum,
};
use crate::pagination::{Keyed, SortKey, SortOrder, SortValue, SortValueKind};

string_enum!(
    /// Workflow state of a ticket.
    TicketStatus {
        Open => "open",
        Pending => "pending",
        Resolved => "resolved",
        Closed => "closed",
    }
);

string_enum!(
    /// Urgency assigned to a ticket.
    TicketPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
);

string_enum!(
    /// Tone detected in the customer's messages.
    Sentiment {
        Positive => "positive",
        Neutral => "neutral",
        Negative => "negative",
    }
);

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Open
    }
}

impl Default for TicketPriority {
    fn default() -> Self {
        TicketPriority::Normal
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub id: TicketId,
    pub org_id: OrgId,
    pub customer_id: CustomerId,
    pub subject: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee_email: Option<String>,
    pub ai_summary: Option<String>,
    pub ai_category: Option<String>,
    pub ai_sentiment: Option<Sentiment>,
    /// Set while the ticket is archived.
    pub archived_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Ticket {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn ai_metadata(&self) -> TicketAiMetadata {
        TicketAiMetadata {
            ticket_id: self.id,
            summary: self.ai_summary.clone(),
            category: self.ai_category.clone(),
            sentiment: self.ai_sentiment,
        }
    }
}

/// AI-derived annotations of a ticket.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TicketAiMetadata {
    pub ticket_id: TicketId,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub sentiment: Option<Sentiment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTicket {
    pub org_id: OrgId,
    pub customer_id: CustomerId,
    pub subject: TicketSubject,
    pub description: Option<TicketDescription>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub assignee_email: Option<AgentEmail>,
}

impl NewTicket {
    #[must_use]
    pub fn new(org_id: OrgId, customer_id: CustomerId, subject: TicketSubject) -> Self {
        Self {
            org_id,
            customer_id,
            subject,
            description: None,
            status: TicketStatus::default(),
            priority: TicketPriority::default(),
            assignee_email: None,
        }
    }
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateTicket {
    pub subject: Option<TicketSubject>,
    pub description: Option<Option<TicketDescription>>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assignee_email: Option<Option<AgentEmail>>,
    pub ai_summary: Option<Option<AiSummary>>,
    pub ai_category: Option<Option<AiCategory>>,
    pub ai_sentiment: Option<Option<Sentiment>>,
    pub archived_at: Option<Option<NaiveDateTime>>,
}

impl UpdateTicket {
    pub fn archive(at: NaiveDateTime) -> Self {
        Self {
            archived_at: Some(Some(at)),
            ..Self::default()
        }
    }

    pub fn restore() -> Self {
        Self {
            archived_at: Some(None),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee_email.is_none()
            && self.ai_summary.is_none()
            && self.ai_category.is_none()
            && self.ai_sentiment.is_none()
            && self.archived_at.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TicketSort {
    CreatedAt,
    UpdatedAt,
    Subject,
}

impl SortKey for TicketSort {
    const DEFAULT: Self = TicketSort::CreatedAt;

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createdAt" | "created_at" => Some(TicketSort::CreatedAt),
            "updatedAt" | "updated_at" => Some(TicketSort::UpdatedAt),
            "subject" => Some(TicketSort::Subject),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TicketSort::CreatedAt => "createdAt",
            TicketSort::UpdatedAt => "updatedAt",
            TicketSort::Subject => "subject",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            TicketSort::CreatedAt => "created_at",
            TicketSort::UpdatedAt => "updated_at",
            TicketSort::Subject => "subject",
        }
    }

    fn kind(&self) -> SortValueKind {
        match self {
            TicketSort::CreatedAt | TicketSort::UpdatedAt => SortValueKind::Timestamp,
            TicketSort::Subject => SortValueKind::Text,
        }
    }

    fn default_order(&self) -> SortOrder {
        match self {
            TicketSort::Subject => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

impl Keyed<TicketSort> for Ticket {
    fn sort_value(&self, sort: TicketSort) -> SortValue {
        match sort {
            TicketSort::CreatedAt => format_timestamp(self.created_at).into(),
            TicketSort::UpdatedAt => format_timestamp(self.updated_at).into(),
            TicketSort::Subject => self.subject.as_str().into(),
        }
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

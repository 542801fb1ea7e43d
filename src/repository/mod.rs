//! Persistence layer: reader/writer traits per resource and their Diesel
//! implementation. Every statement is scoped by the caller's organization.

use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::customer::{Customer, CustomerSort, NewCustomer, UpdateCustomer};
use crate::domain::notification::{NewNotification, Notification, NotificationSort};
use crate::domain::template::{NewTemplate, Template, TemplateSort, UpdateTemplate};
use crate::domain::ticket::{
    NewTicket, Ticket, TicketPriority, TicketSort, TicketStatus, UpdateTicket,
};
use crate::domain::types::{CustomerId, NotificationId, OrgId, TemplateId, TicketId};
use crate::pagination::{KeysetQuery, Page};
use crate::repository::errors::RepositoryResult;

/// Applies the keyset seek predicate and the `(column, id)` ordering to a
/// boxed query.
macro_rules! seek_and_order {
    ($query:expr, $column:expr, $id:expr, $order:expr, $seek:expr) => {{
        let query = $query;
        let query = match $seek {
            Some((value, id)) => match $order {
                $crate::pagination::SortOrder::Asc => query.filter(
                    $column
                        .gt(value.clone())
                        .or($column.eq(value).and($id.gt(id))),
                ),
                $crate::pagination::SortOrder::Desc => query.filter(
                    $column
                        .lt(value.clone())
                        .or($column.eq(value).and($id.lt(id))),
                ),
            },
            None => query,
        };
        match $order {
            $crate::pagination::SortOrder::Asc => query.order_by(($column.asc(), $id.asc())),
            $crate::pagination::SortOrder::Desc => query.order_by(($column.desc(), $id.desc())),
        }
    }};
}

pub mod customer;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod notification;
pub mod template;
pub mod ticket;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone)]
pub struct CustomerListQuery {
    pub org_id: OrgId,
    pub search: Option<String>,
    pub page: KeysetQuery<CustomerSort>,
}

impl CustomerListQuery {
    pub fn new(org_id: OrgId, page: KeysetQuery<CustomerSort>) -> Self {
        Self {
            org_id,
            search: None,
            page,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct TicketListQuery {
    pub org_id: OrgId,
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub customer_id: Option<CustomerId>,
    /// `true` lists archived tickets only, `false` active ones only.
    pub archived: bool,
    pub page: KeysetQuery<TicketSort>,
}

impl TicketListQuery {
    pub fn new(org_id: OrgId, page: KeysetQuery<TicketSort>) -> Self {
        Self {
            org_id,
            search: None,
            status: None,
            priority: None,
            customer_id: None,
            archived: false,
            page,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TemplateListQuery {
    pub org_id: OrgId,
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: KeysetQuery<TemplateSort>,
}

impl TemplateListQuery {
    pub fn new(org_id: OrgId, page: KeysetQuery<TemplateSort>) -> Self {
        Self {
            org_id,
            search: None,
            category: None,
            page,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct NotificationListQuery {
    pub org_id: OrgId,
    pub unread_only: bool,
    pub page: KeysetQuery<NotificationSort>,
}

impl NotificationListQuery {
    pub fn new(org_id: OrgId, page: KeysetQuery<NotificationSort>) -> Self {
        Self {
            org_id,
            unread_only: false,
            page,
        }
    }

    pub fn unread_only(mut self, unread_only: bool) -> Self {
        self.unread_only = unread_only;
        self
    }
}

pub trait CustomerReader {
    fn get_customer_by_id(&self, id: CustomerId, org_id: OrgId)
    -> RepositoryResult<Option<Customer>>;
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Page<Customer>>;
}

pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn update_customer(
        &self,
        id: CustomerId,
        org_id: OrgId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
    fn delete_customer(&self, id: CustomerId, org_id: OrgId) -> RepositoryResult<Customer>;
}

pub trait TicketReader {
    fn get_ticket_by_id(&self, id: TicketId, org_id: OrgId) -> RepositoryResult<Option<Ticket>>;
    fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<Page<Ticket>>;
}

pub trait TicketWriter {
    fn create_ticket(&self, new_ticket: &NewTicket) -> RepositoryResult<Ticket>;
    fn update_ticket(
        &self,
        id: TicketId,
        org_id: OrgId,
        updates: &UpdateTicket,
    ) -> RepositoryResult<Ticket>;
}

pub trait TemplateReader {
    fn get_template_by_id(&self, id: TemplateId, org_id: OrgId)
    -> RepositoryResult<Option<Template>>;
    fn list_templates(&self, query: TemplateListQuery) -> RepositoryResult<Page<Template>>;
}

pub trait TemplateWriter {
    fn create_template(&self, new_template: &NewTemplate) -> RepositoryResult<Template>;
    fn update_template(
        &self,
        id: TemplateId,
        org_id: OrgId,
        updates: &UpdateTemplate,
    ) -> RepositoryResult<Template>;
    fn delete_template(&self, id: TemplateId, org_id: OrgId) -> RepositoryResult<Template>;
    /// Increments `usage_count` in a single statement. The column is capped
    /// at `i32::MAX`, past which the write fails as `ConstraintViolation`.
    fn record_template_use(&self, id: TemplateId, org_id: OrgId) -> RepositoryResult<Template>;
}

pub trait NotificationReader {
    fn list_notifications(
        &self,
        query: NotificationListQuery,
    ) -> RepositoryResult<Page<Notification>>;
}

pub trait NotificationWriter {
    fn create_notification(
        &self,
        new_notification: &NewNotification,
    ) -> RepositoryResult<Notification>;
    /// Clears `read_at` when `None`; otherwise stamps it unless the
    /// notification was already read.
    fn set_notification_read_at(
        &self,
        id: NotificationId,
        org_id: OrgId,
        read_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Notification>;
    /// Marks every unread notification of the organization as read and
    /// returns how many changed.
    fn mark_all_notifications_read(
        &self,
        org_id: OrgId,
        read_at: NaiveDateTime,
    ) -> RepositoryResult<usize>;
    fn delete_notification(
        &self,
        id: NotificationId,
        org_id: OrgId,
    ) -> RepositoryResult<Notification>;
}

//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::template::{NewTemplate, Template, UpdateTemplate};
use crate::domain::ticket::{NewTicket, Ticket, UpdateTicket};
use crate::domain::types::{CustomerId, NotificationId, OrgId, TemplateId, TicketId};
use crate::pagination::Page;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CustomerListQuery, CustomerReader, CustomerWriter, NotificationListQuery, NotificationReader,
    NotificationWriter, TemplateListQuery, TemplateReader, TemplateWriter, TicketListQuery,
    TicketReader, TicketWriter,
};

mock! {
    pub Repository {}

    impl CustomerReader for Repository {
        fn get_customer_by_id(&self, id: CustomerId, org_id: OrgId) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Page<Customer>>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn update_customer(
            &self,
            id: CustomerId,
            org_id: OrgId,
            updates: &UpdateCustomer,
        ) -> RepositoryResult<Customer>;
        fn delete_customer(&self, id: CustomerId, org_id: OrgId) -> RepositoryResult<Customer>;
    }

    impl TicketReader for Repository {
        fn get_ticket_by_id(&self, id: TicketId, org_id: OrgId) -> RepositoryResult<Option<Ticket>>;
        fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<Page<Ticket>>;
    }

    impl TicketWriter for Repository {
        fn create_ticket(&self, new_ticket: &NewTicket) -> RepositoryResult<Ticket>;
        fn update_ticket(
            &self,
            id: TicketId,
            org_id: OrgId,
            updates: &UpdateTicket,
        ) -> RepositoryResult<Ticket>;
    }

    impl TemplateReader for Repository {
        fn get_template_by_id(&self, id: TemplateId, org_id: OrgId) -> RepositoryResult<Option<Template>>;
        fn list_templates(&self, query: TemplateListQuery) -> RepositoryResult<Page<Template>>;
    }

    impl TemplateWriter for Repository {
        fn create_template(&self, new_template: &NewTemplate) -> RepositoryResult<Template>;
        fn update_template(
            &self,
            id: TemplateId,
            org_id: OrgId,
            updates: &UpdateTemplate,
        ) -> RepositoryResult<Template>;
        fn delete_template(&self, id: TemplateId, org_id: OrgId) -> RepositoryResult<Template>;
        fn record_template_use(&self, id: TemplateId, org_id: OrgId) -> RepositoryResult<Template>;
    }

    impl NotificationReader for Repository {
        fn list_notifications(
            &self,
            query: NotificationListQuery,
        ) -> RepositoryResult<Page<Notification>>;
    }

    impl NotificationWriter for Repository {
        fn create_notification(
            &self,
            new_notification: &NewNotification,
        ) -> RepositoryResult<Notification>;
        fn set_notification_read_at(
            &self,
            id: NotificationId,
            org_id: OrgId,
            read_at: Option<NaiveDateTime>,
        ) -> RepositoryResult<Notification>;
        fn mark_all_notifications_read(
            &self,
            org_id: OrgId,
            read_at: NaiveDateTime,
        ) -> RepositoryResult<usize>;
        fn delete_notification(&self, id: NotificationId, org_id: OrgId) -> RepositoryResult<Notification>;
    }
}

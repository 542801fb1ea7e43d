//! Ticket operations. Deleting a ticket archives it; restoring clears the
//! archive mark.

use serde_json::json;

use crate::cache::{ListCache, ResourceKind};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::ticket::{Ticket, TicketPriority, TicketSort, TicketStatus, UpdateTicket};
use crate::domain::types::{CustomerId, OrgId, TicketId, now};
use crate::dto::tickets::{TicketAiMetadataDto, TicketDto, TicketListParams};
use crate::forms::tickets::{CreateTicketForm, UpdateTicketForm};
use crate::pagination::{Page, PageLimits};
use crate::repository::errors::RepositoryError;
use crate::repository::{CustomerReader, TicketListQuery, TicketReader, TicketWriter};
use crate::services::{
    ServiceError, ServiceResult, authorize, cached_page, parse_filter, parse_flag, plan_list,
    repository_failure,
};

fn parse_id(raw: &str) -> ServiceResult<TicketId> {
    raw.parse().map_err(|_| ServiceError::NotFound)
}

fn unknown_customer(customer_id: CustomerId) -> ServiceError {
    ServiceError::Validation {
        message: "unknown customer".to_string(),
        details: Some(json!({ "customerId": [customer_id.to_string()] })),
    }
}

pub fn list_tickets<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    params: &TicketListParams,
    limits: PageLimits,
) -> ServiceResult<Page<TicketDto>>
where
    R: TicketReader + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let (list, page) = plan_list::<TicketSort>(&params.list, limits)?;
    let status = parse_filter::<TicketStatus>(params.status.as_deref(), "status")?;
    let priority = parse_filter::<TicketPriority>(params.priority.as_deref(), "priority")?;
    let customer_id = parse_filter::<CustomerId>(params.customer_id.as_deref(), "customerId")?;
    let archived = parse_flag(params.archived.as_deref(), "archived")?.unwrap_or(false);

    let mut query = TicketListQuery::new(org_id, page).archived(archived);
    if let Some(term) = &list.search {
        query = query.search(term.clone());
    }
    if let Some(status) = status {
        query = query.status(status);
    }
    if let Some(priority) = priority {
        query = query.priority(priority);
    }
    if let Some(customer_id) = customer_id {
        query = query.customer(customer_id);
    }

    let fingerprint = format!(
        "{}&status={status:?}&priority={priority:?}&customer={customer_id:?}&archived={archived}",
        list.fingerprint()
    );
    let key = cache.key(org_id, ResourceKind::Tickets, &fingerprint);
    cached_page(cache, key, || {
        let page = repo
            .list_tickets(query)
            .map_err(repository_failure("list tickets"))?;
        Ok(page.map(TicketDto::from))
    })
}

pub fn get_ticket<R>(repo: &R, user: &AuthenticatedUser, id: &str) -> ServiceResult<TicketDto>
where
    R: TicketReader + ?Sized,
{
    let org_id = authorize(user)?;
    load(repo, parse_id(id)?, org_id).map(TicketDto::from)
}

/// AI annotations of a ticket, archived or not.
pub fn get_ticket_ai<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: &str,
) -> ServiceResult<TicketAiMetadataDto>
where
    R: TicketReader + ?Sized,
{
    let org_id = authorize(user)?;
    let ticket = load(repo, parse_id(id)?, org_id)?;
    Ok(ticket.ai_metadata().into())
}

fn load<R>(repo: &R, id: TicketId, org_id: OrgId) -> ServiceResult<Ticket>
where
    R: TicketReader + ?Sized,
{
    repo.get_ticket_by_id(id, org_id)
        .map_err(repository_failure("load ticket"))?
        .ok_or(ServiceError::NotFound)
}

/// Opens a ticket for a customer of the caller's organization.
pub fn create_ticket<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    form: CreateTicketForm,
) -> ServiceResult<TicketDto>
where
    R: TicketWriter + CustomerReader + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let new_ticket = form.into_domain(org_id)?;
    let customer_id = new_ticket.customer_id;

    let customer = repo
        .get_customer_by_id(customer_id, org_id)
        .map_err(repository_failure("load customer"))?;
    if customer.is_none() {
        return Err(unknown_customer(customer_id));
    }

    let ticket = repo.create_ticket(&new_ticket).map_err(|err| match err {
        // The customer was deleted after the check above.
        RepositoryError::ForeignKeyViolation(_) => unknown_customer(customer_id),
        other => repository_failure("create ticket")(other),
    })?;

    cache.invalidate(org_id, ResourceKind::Tickets);
    log::info!("Ticket {} opened by {}", ticket.id, user.sub);
    Ok(ticket.into())
}

pub fn update_ticket<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
    form: UpdateTicketForm,
) -> ServiceResult<TicketDto>
where
    R: TicketWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let updates = form.into_domain()?;
    apply(repo, cache, org_id, id, &updates, "update ticket")
}

pub fn archive_ticket<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
) -> ServiceResult<TicketDto>
where
    R: TicketWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let ticket = apply(repo, cache, org_id, id, &UpdateTicket::archive(now()), "archive ticket")?;
    log::info!("Ticket {id} archived by {}", user.sub);
    Ok(ticket)
}

pub fn restore_ticket<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
) -> ServiceResult<TicketDto>
where
    R: TicketWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    apply(repo, cache, org_id, id, &UpdateTicket::restore(), "restore ticket")
}

fn apply<R, C>(
    repo: &R,
    cache: &C,
    org_id: OrgId,
    id: TicketId,
    updates: &UpdateTicket,
    action: &'static str,
) -> ServiceResult<TicketDto>
where
    R: TicketWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let ticket = repo
        .update_ticket(id, org_id, updates)
        .map_err(repository_failure(action))?;
    cache.invalidate(org_id, ResourceKind::Tickets);
    Ok(ticket.into())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::customer::Customer;
    use crate::domain::ticket::Sentiment;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{agent, cache, org};

    fn ticket(customer_id: CustomerId) -> Ticket {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Ticket {
            id: TicketId::new(),
            org_id: org(),
            customer_id,
            subject: "Printer on fire".to_string(),
            description: None,
            status: TicketStatus::Open,
            priority: TicketPriority::Urgent,
            assignee_email: None,
            ai_summary: Some("Printer caught fire".to_string()),
            ai_category: Some("hardware".to_string()),
            ai_sentiment: Some(Sentiment::Negative),
            archived_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn customer(id: CustomerId) -> Customer {
        Customer {
            id,
            org_id: org(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            company: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn create_form(customer_id: CustomerId) -> CreateTicketForm {
        serde_json::from_value(serde_json::json!({
            "customerId": customer_id.to_string(),
            "subject": "Printer on fire",
            "priority": "urgent",
        }))
        .unwrap()
    }

    #[test]
    fn default_list_hides_archived_tickets() {
        let mut repo = MockRepository::new();
        repo.expect_list_tickets()
            .withf(|query| !query.archived && query.status == Some(TicketStatus::Open))
            .times(1)
            .returning(|_| Ok(Page::last(vec![])));
        let params = TicketListParams {
            status: Some("open".to_string()),
            ..TicketListParams::default()
        };

        let page = list_tickets(&repo, &cache(), &agent(), &params, PageLimits::default()).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn invalid_filters_are_rejected_before_querying() {
        let mut repo = MockRepository::new();
        repo.expect_list_tickets().times(0);
        for params in [
            TicketListParams {
                status: Some("done".to_string()),
                ..TicketListParams::default()
            },
            TicketListParams {
                archived: Some("yes".to_string()),
                ..TicketListParams::default()
            },
            TicketListParams {
                customer_id: Some("42".to_string()),
                ..TicketListParams::default()
            },
        ] {
            let result = list_tickets(&repo, &cache(), &agent(), &params, PageLimits::default());
            assert!(matches!(result, Err(ServiceError::Validation { .. })));
        }
    }

    #[test]
    fn create_requires_customer_in_org() {
        let customer_id = CustomerId::new();
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .withf(move |id, org_id| *id == customer_id && *org_id == org())
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_create_ticket().times(0);

        let result = create_ticket(&repo, &cache(), &agent(), create_form(customer_id));

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
    }

    #[test]
    fn create_returns_new_ticket() {
        let customer_id = CustomerId::new();
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id, _| Ok(Some(customer(id))));
        repo.expect_create_ticket()
            .withf(|new_ticket| new_ticket.priority == TicketPriority::Urgent)
            .times(1)
            .returning(|new_ticket| Ok(ticket(new_ticket.customer_id)));

        let dto = create_ticket(&repo, &cache(), &agent(), create_form(customer_id)).unwrap();
        assert_eq!(dto.customer_id, customer_id.to_string());
        assert_eq!(dto.priority, TicketPriority::Urgent);
    }

    #[test]
    fn delete_archives_and_restore_clears() {
        let mut repo = MockRepository::new();
        repo.expect_update_ticket()
            .withf(|_, _, updates| matches!(updates.archived_at, Some(Some(_))))
            .times(1)
            .returning(|_, _, _| {
                let mut archived = ticket(CustomerId::new());
                archived.archived_at = Some(now());
                Ok(archived)
            });
        repo.expect_update_ticket()
            .withf(|_, _, updates| updates.archived_at == Some(None))
            .times(1)
            .returning(|_, _, _| Ok(ticket(CustomerId::new())));
        let id = TicketId::new().to_string();

        let archived = archive_ticket(&repo, &cache(), &agent(), &id).unwrap();
        assert!(archived.archived_at.is_some());
        let restored = restore_ticket(&repo, &cache(), &agent(), &id).unwrap();
        assert!(restored.archived_at.is_none());
    }

    #[test]
    fn update_of_foreign_ticket_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_update_ticket()
            .times(1)
            .returning(|_, _, _| Err(RepositoryError::NotFound));
        let form: UpdateTicketForm = serde_json::from_str(r#"{"status": "resolved"}"#).unwrap();

        let result = update_ticket(&repo, &cache(), &agent(), &TicketId::new().to_string(), form);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn ai_metadata_is_projected() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id()
            .returning(|_, _| Ok(Some(ticket(CustomerId::new()))));

        let ai = get_ticket_ai(&repo, &agent(), &TicketId::new().to_string()).unwrap();
        assert_eq!(ai.category.as_deref(), Some("hardware"));
        assert_eq!(ai.sentiment, Some(Sentiment::Negative));
    }
}

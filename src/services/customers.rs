//! Customer directory operations.

use crate::cache::{ListCache, ResourceKind};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::customer::CustomerSort;
use crate::domain::types::CustomerId;
use crate::dto::customers::{CustomerDto, CustomerListParams};
use crate::forms::customers::{CreateCustomerForm, UpdateCustomerForm};
use crate::pagination::{Page, PageLimits};
use crate::repository::errors::RepositoryError;
use crate::repository::{CustomerListQuery, CustomerReader, CustomerWriter};
use crate::services::{
    ConflictCode, ServiceError, ServiceResult, authorize, cached_page, plan_list,
    repository_failure,
};

fn parse_id(raw: &str) -> ServiceResult<CustomerId> {
    raw.parse().map_err(|_| ServiceError::NotFound)
}

pub fn list_customers<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    params: &CustomerListParams,
    limits: PageLimits,
) -> ServiceResult<Page<CustomerDto>>
where
    R: CustomerReader + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let (params, page) = plan_list::<CustomerSort>(&params.list, limits)?;

    let mut query = CustomerListQuery::new(org_id, page);
    if let Some(term) = &params.search {
        query = query.search(term.clone());
    }

    let key = cache.key(org_id, ResourceKind::Customers, &params.fingerprint());
    cached_page(cache, key, || {
        let page = repo
            .list_customers(query)
            .map_err(repository_failure("list customers"))?;
        Ok(page.map(CustomerDto::from))
    })
}

pub fn get_customer<R>(repo: &R, user: &AuthenticatedUser, id: &str) -> ServiceResult<CustomerDto>
where
    R: CustomerReader + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let customer = repo
        .get_customer_by_id(id, org_id)
        .map_err(repository_failure("load customer"))?
        .ok_or(ServiceError::NotFound)?;
    Ok(customer.into())
}

/// Unique violations on customers can only come from the scoped email.
fn customer_write_failure(action: &'static str) -> impl Fn(RepositoryError) -> ServiceError {
    move |err| match err {
        RepositoryError::UniqueViolation(_) => ServiceError::Conflict(ConflictCode::DuplicateEmail),
        other => repository_failure(action)(other),
    }
}

pub fn create_customer<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    form: CreateCustomerForm,
) -> ServiceResult<CustomerDto>
where
    R: CustomerWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let new_customer = form.into_domain(org_id)?;

    let customer = repo
        .create_customer(&new_customer)
        .map_err(customer_write_failure("create customer"))?;

    cache.invalidate(org_id, ResourceKind::Customers);
    log::info!("Customer {} created by {}", customer.id, user.sub);
    Ok(customer.into())
}

pub fn update_customer<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
    form: UpdateCustomerForm,
) -> ServiceResult<CustomerDto>
where
    R: CustomerWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let updates = form.into_domain()?;

    let customer = repo
        .update_customer(id, org_id, &updates)
        .map_err(customer_write_failure("update customer"))?;

    cache.invalidate(org_id, ResourceKind::Customers);
    Ok(customer.into())
}

/// Deletes a customer that no ticket references.
pub fn delete_customer<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
) -> ServiceResult<CustomerDto>
where
    R: CustomerWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;

    let customer = repo.delete_customer(id, org_id).map_err(|err| match err {
        RepositoryError::ForeignKeyViolation(_) => {
            ServiceError::Conflict(ConflictCode::HasDependents)
        }
        other => repository_failure("delete customer")(other),
    })?;

    cache.invalidate(org_id, ResourceKind::Customers);
    log::info!("Customer {id} deleted by {}", user.sub);
    Ok(customer.into())
}

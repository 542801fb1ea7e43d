use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::customer::Customer`].
pub struct Customer {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
/// Insertable form of [`Customer`].
pub struct NewCustomer<'a> {
    pub id: String,
    pub org_id: String,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
/// Column updates for a [`Customer`]; `None` fields are left untouched.
pub struct UpdateCustomer<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub company: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Customer> for DomainCustomer {
    type Error = TypeConstraintError;

    fn try_from(customer: Customer) -> Result<Self, Self::Error> {
        Ok(Self {
            id: customer.id.try_into()?,
            org_id: customer.org_id.try_into()?,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            company: customer.company,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        })
    }
}

impl<'a> NewCustomer<'a> {
    /// Builds the row with a fresh id and matching creation timestamps.
    pub fn from_domain(customer: &'a DomainNewCustomer, now: NaiveDateTime) -> Self {
        Self {
            id: crate::domain::types::CustomerId::new().to_string(),
            org_id: customer.org_id.to_string(),
            name: customer.name.as_str(),
            email: customer.email.as_str(),
            phone: customer.phone.as_ref().map(|p| p.as_str()),
            company: customer.company.as_ref().map(|c| c.as_str()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateCustomer<'a> {
    pub fn from_domain(updates: &'a DomainUpdateCustomer, now: NaiveDateTime) -> Self {
        Self {
            name: updates.name.as_ref().map(|n| n.as_str()),
            email: updates.email.as_ref().map(|e| e.as_str()),
            phone: updates
                .phone
                .as_ref()
                .map(|phone| phone.as_ref().map(|p| p.as_str())),
            company: updates
                .company
                .as_ref()
                .map(|company| company.as_ref().map(|c| c.as_str())),
            updated_at: now,
        }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CompanyName, CustomerEmail, CustomerId, CustomerName, OrgId, PhoneNumber, format_timestamp,
};
use crate::pagination::{Keyed, SortKey, SortOrder, SortValue, SortValueKind};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub org_id: OrgId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCustomer {
    pub org_id: OrgId,
    pub name: CustomerName,
    pub email: CustomerEmail,
    pub phone: Option<PhoneNumber>,
    pub company: Option<CompanyName>,
}

impl NewCustomer {
    #[must_use]
    pub fn new(
        org_id: OrgId,
        name: CustomerName,
        email: CustomerEmail,
        phone: Option<PhoneNumber>,
        company: Option<CompanyName>,
    ) -> Self {
        Self {
            org_id,
            name,
            email,
            phone,
            company,
        }
    }
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateCustomer {
    pub name: Option<CustomerName>,
    pub email: Option<CustomerEmail>,
    pub phone: Option<Option<PhoneNumber>>,
    pub company: Option<Option<CompanyName>>,
}

impl UpdateCustomer {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.company.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomerSort {
    CreatedAt,
    UpdatedAt,
    Name,
    Email,
}

impl SortKey for CustomerSort {
    const DEFAULT: Self = CustomerSort::CreatedAt;

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createdAt" | "created_at" => Some(CustomerSort::CreatedAt),
            "updatedAt" | "updated_at" => Some(CustomerSort::UpdatedAt),
            "name" => Some(CustomerSort::Name),
            "email" => Some(CustomerSort::Email),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            CustomerSort::CreatedAt => "createdAt",
            CustomerSort::UpdatedAt => "updatedAt",
            CustomerSort::Name => "name",
            CustomerSort::Email => "email",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            CustomerSort::CreatedAt => "created_at",
            CustomerSort::UpdatedAt => "updated_at",
            CustomerSort::Name => "name",
            CustomerSort::Email => "email",
        }
    }

    fn kind(&self) -> SortValueKind {
        match self {
            CustomerSort::CreatedAt | CustomerSort::UpdatedAt => SortValueKind::Timestamp,
            CustomerSort::Name | CustomerSort::Email => SortValueKind::Text,
        }
    }

    fn default_order(&self) -> SortOrder {
        match self {
            CustomerSort::CreatedAt | CustomerSort::UpdatedAt => SortOrder::Desc,
            CustomerSort::Name | CustomerSort::Email => SortOrder::Asc,
        }
    }
}

impl Keyed<CustomerSort> for Customer {
    fn sort_value(&self, sort: CustomerSort) -> SortValue {
        match sort {
            CustomerSort::CreatedAt => format_timestamp(self.created_at).into(),
            CustomerSort::UpdatedAt => format_timestamp(self.updated_at).into(),
            CustomerSort::Name => self.name.as_str().into(),
            CustomerSort::Email => self.email.as_str().into(),
        }
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_detected() {
        assert!(UpdateCustomer::default().is_empty());
        let clear_phone = UpdateCustomer {
            phone: Some(None),
            ..UpdateCustomer::default()
        };
        assert!(!clear_phone.is_empty());
    }

    #[test]
    fn sort_names_round_trip() {
        for sort in [
            CustomerSort::CreatedAt,
            CustomerSort::UpdatedAt,
            CustomerSort::Name,
            CustomerSort::Email,
        ] {
            assert_eq!(CustomerSort::parse(sort.as_str()), Some(sort));
        }
        assert_eq!(CustomerSort::parse("org_id"), None);
    }
}

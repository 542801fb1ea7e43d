use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::types::format_timestamp;
use crate::pagination::RawListParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            company: customer.company,
            created_at: format_timestamp(customer.created_at),
            updated_at: format_timestamp(customer.updated_at),
        }
    }
}

/// Query string of `GET /customers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerListParams {
    #[serde(flatten)]
    pub list: RawListParams,
}

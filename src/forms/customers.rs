use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::{NewCustomer, UpdateCustomer};
use crate::domain::types::{CompanyName, CustomerEmail, CustomerName, OrgId, PhoneNumber};
use crate::forms::{FormError, deserialize_some, non_blank, nullable_patch};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Body of `POST /customers`.
pub struct CreateCustomerForm {
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(length(max = 120))]
    pub company: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Body of `PATCH /customers/{id}`.
pub struct UpdateCustomerForm {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub company: Option<Option<String>>,
}

impl CreateCustomerForm {
    pub fn into_domain(self, org_id: OrgId) -> Result<NewCustomer, FormError> {
        self.validate()?;
        Ok(NewCustomer::new(
            org_id,
            CustomerName::new(self.name).map_err(FormError::field("name"))?,
            CustomerEmail::new(self.email).map_err(FormError::field("email"))?,
            non_blank(self.phone)
                .map(PhoneNumber::new)
                .transpose()
                .map_err(FormError::field("phone"))?,
            non_blank(self.company)
                .map(CompanyName::new)
                .transpose()
                .map_err(FormError::field("company"))?,
        ))
    }
}

impl UpdateCustomerForm {
    pub fn into_domain(self) -> Result<UpdateCustomer, FormError> {
        self.validate()?;
        let updates = UpdateCustomer {
            name: self
                .name
                .map(CustomerName::new)
                .transpose()
                .map_err(FormError::field("name"))?,
            email: self
                .email
                .map(CustomerEmail::new)
                .transpose()
                .map_err(FormError::field("email"))?,
            phone: nullable_patch(self.phone, "phone", PhoneNumber::new)?,
            company: nullable_patch(self.company, "company", CompanyName::new)?,
        };
        if updates.is_empty() {
            return Err(FormError::EmptyUpdate);
        }
        Ok(updates)
    }
}

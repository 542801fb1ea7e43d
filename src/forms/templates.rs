use serde::Deserialize;
use validator::Validate;

use crate::domain::template::{NewTemplate, UpdateTemplate};
use crate::domain::types::{
    OrgId, TemplateBody, TemplateCategory, TemplateName, TypeConstraintError, UsageCount,
};
use crate::forms::{FormError, deserialize_some, non_blank, nullable_patch};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Body of `POST /templates`.
pub struct CreateTemplateForm {
    #[validate(length(min = 2, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 20000))]
    pub body: String,
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// Body of `PATCH /templates/{id}`.
pub struct UpdateTemplateForm {
    #[validate(length(min = 2, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category: Option<Option<String>>,
    #[validate(range(min = 0, max = 2147483647))]
    pub usage_count: Option<i64>,
}

impl CreateTemplateForm {
    pub fn into_domain(self, org_id: OrgId) -> Result<NewTemplate, FormError> {
        self.validate()?;
        Ok(NewTemplate::new(
            org_id,
            TemplateName::new(self.name).map_err(FormError::field("name"))?,
            TemplateBody::new(self.body).map_err(FormError::field("body"))?,
            non_blank(self.category)
                .map(TemplateCategory::new)
                .transpose()
                .map_err(FormError::field("category"))?,
        ))
    }
}

impl UpdateTemplateForm {
    pub fn into_domain(self) -> Result<UpdateTemplate, FormError> {
        self.validate()?;
        let usage_count = self
            .usage_count
            .map(|count| {
                i32::try_from(count)
                    .map_err(|_| TypeConstraintError::InvalidValue(count.to_string()))
                    .and_then(UsageCount::new)
            })
            .transpose()
            .map_err(FormError::field("usageCount"))?;
        let updates = UpdateTemplate {
            name: self
                .name
                .map(TemplateName::new)
                .transpose()
                .map_err(FormError::field("name"))?,
            body: self
                .body
                .map(TemplateBody::new)
                .transpose()
                .map_err(FormError::field("body"))?,
            category: nullable_patch(self.category, "category", TemplateCategory::new)?,
            usage_count,
        };
        if updates.is_empty() {
            return Err(FormError::EmptyUpdate);
        }
        Ok(updates)
    }
}

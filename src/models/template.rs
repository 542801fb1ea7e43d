use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::template::{
    NewTemplate as DomainNewTemplate, Template as DomainTemplate,
    UpdateTemplate as DomainUpdateTemplate,
};
use crate::domain::types::{TemplateId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::templates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::template::Template`].
pub struct Template {
    pub id: String,
    pub org_id: String,
    pub name: String,
    pub body: String,
    pub category: Option<String>,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::templates)]
pub struct NewTemplate<'a> {
    pub id: String,
    pub org_id: String,
    pub name: &'a str,
    pub body: &'a str,
    pub category: Option<&'a str>,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::templates)]
pub struct UpdateTemplate<'a> {
    pub name: Option<&'a str>,
    pub body: Option<&'a str>,
    pub category: Option<Option<&'a str>>,
    pub usage_count: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Template> for DomainTemplate {
    type Error = TypeConstraintError;

    fn try_from(template: Template) -> Result<Self, Self::Error> {
        Ok(Self {
            id: template.id.try_into()?,
            org_id: template.org_id.try_into()?,
            name: template.name,
            body: template.body,
            category: template.category,
            usage_count: template.usage_count,
            created_at: template.created_at,
            updated_at: template.updated_at,
        })
    }
}

impl<'a> NewTemplate<'a> {
    pub fn from_domain(template: &'a DomainNewTemplate, now: NaiveDateTime) -> Self {
        Self {
            id: TemplateId::new().to_string(),
            org_id: template.org_id.to_string(),
            name: template.name.as_str(),
            body: template.body.as_str(),
            category: template.category.as_ref().map(|c| c.as_str()),
            usage_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateTemplate<'a> {
    pub fn from_domain(updates: &'a DomainUpdateTemplate, now: NaiveDateTime) -> Self {
        Self {
            name: updates.name.as_ref().map(|n| n.as_str()),
            body: updates.body.as_ref().map(|b| b.as_str()),
            category: updates
                .category
                .as_ref()
                .map(|c| c.as_ref().map(|c| c.as_str())),
            usage_count: updates.usage_count.map(|c| c.get()),
            updated_at: now,
        }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    OrgId, TemplateBody, TemplateCategory, TemplateId, TemplateName, UsageCount, format_timestamp,
};
use crate::pagination::{Keyed, SortKey, SortOrder, SortValue, SortValueKind};

/// Canned reply text agents insert into tickets.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: TemplateId,
    pub org_id: OrgId,
    pub name: String,
    pub body: String,
    pub category: Option<String>,
    pub usage_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTemplate {
    pub org_id: OrgId,
    pub name: TemplateName,
    pub body: TemplateBody,
    pub category: Option<TemplateCategory>,
}

impl NewTemplate {
    #[must_use]
    pub fn new(
        org_id: OrgId,
        name: TemplateName,
        body: TemplateBody,
        category: Option<TemplateCategory>,
    ) -> Self {
        Self {
            org_id,
            name,
            body,
            category,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateTemplate {
    pub name: Option<TemplateName>,
    pub body: Option<TemplateBody>,
    pub category: Option<Option<TemplateCategory>>,
    pub usage_count: Option<UsageCount>,
}

impl UpdateTemplate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.body.is_none()
            && self.category.is_none()
            && self.usage_count.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateSort {
    UpdatedAt,
    CreatedAt,
    Name,
    UsageCount,
}

impl SortKey for TemplateSort {
    const DEFAULT: Self = TemplateSort::UpdatedAt;

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "updatedAt" | "updated_at" => Some(TemplateSort::UpdatedAt),
            "createdAt" | "created_at" => Some(TemplateSort::CreatedAt),
            "name" => Some(TemplateSort::Name),
            "usageCount" | "usage_count" => Some(TemplateSort::UsageCount),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TemplateSort::UpdatedAt => "updatedAt",
            TemplateSort::CreatedAt => "createdAt",
            TemplateSort::Name => "name",
            TemplateSort::UsageCount => "usageCount",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            TemplateSort::UpdatedAt => "updated_at",
            TemplateSort::CreatedAt => "created_at",
            TemplateSort::Name => "name",
            TemplateSort::UsageCount => "usage_count",
        }
    }

    fn kind(&self) -> SortValueKind {
        match self {
            TemplateSort::UpdatedAt | TemplateSort::CreatedAt => SortValueKind::Timestamp,
            TemplateSort::Name => SortValueKind::Text,
            TemplateSort::UsageCount => SortValueKind::Integer,
        }
    }

    fn default_order(&self) -> SortOrder {
        match self {
            TemplateSort::Name => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

impl Keyed<TemplateSort> for Template {
    fn sort_value(&self, sort: TemplateSort) -> SortValue {
        match sort {
            TemplateSort::UpdatedAt => format_timestamp(self.updated_at).into(),
            TemplateSort::CreatedAt => format_timestamp(self.created_at).into(),
            TemplateSort::Name => self.name.as_str().into(),
            TemplateSort::UsageCount => self.usage_count.into(),
        }
    }

    fn key(&self) -> String {
        self.id.to_string()
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::template::Template;
use crate::domain::types::format_timestamp;
use crate::pagination::RawListParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDto {
    pub id: String,
    pub name: String,
    pub body: String,
    pub category: Option<String>,
    pub usage_count: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Template> for TemplateDto {
    fn from(template: Template) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name,
            body: template.body,
            category: template.category,
            usage_count: template.usage_count,
            created_at: format_timestamp(template.created_at),
            updated_at: format_timestamp(template.updated_at),
        }
    }
}

/// Query string of `GET /templates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateListParams {
    #[serde(flatten)]
    pub list: RawListParams,
    pub category: Option<String>,
}

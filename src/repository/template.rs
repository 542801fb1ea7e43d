//! Repository implementation for reply templates.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        template::{NewTemplate, Template, TemplateSort, UpdateTemplate},
        types::{OrgId, TemplateId, now},
    },
    models::template::{
        NewTemplate as DbNewTemplate, Template as DbTemplate, UpdateTemplate as DbUpdateTemplate,
    },
    pagination::{Page, like_pattern},
    repository::{
        DieselRepository, TemplateListQuery, TemplateReader, TemplateWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl TemplateReader for DieselRepository {
    fn get_template_by_id(
        &self,
        id: TemplateId,
        org_id: OrgId,
    ) -> RepositoryResult<Option<Template>> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let db_template = templates::table
            .filter(templates::id.eq(id.to_string()))
            .filter(templates::org_id.eq(org_id.to_string()))
            .select(DbTemplate::as_select())
            .first::<DbTemplate>(&mut conn)
            .optional()?;

        match db_template {
            Some(db_template) => Ok(Some(
                Template::try_from(db_template).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_templates(&self, query: TemplateListQuery) -> RepositoryResult<Page<Template>> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let page = &query.page;
        log::debug!("Listing templates of {}: {page}", query.org_id);

        let mut items = templates::table
            .filter(templates::org_id.eq(query.org_id.to_string()))
            .select(DbTemplate::as_select())
            .into_boxed::<Sqlite>();

        if let Some(category) = &query.category {
            items = items.filter(templates::category.eq(category.clone()));
        }

        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            items = items.filter(
                templates::name
                    .like(pattern.clone())
                    .escape('\\')
                    .or(templates::body.like(pattern).escape('\\')),
            );
        }

        let items = match page.sort() {
            TemplateSort::UpdatedAt => seek_and_order!(
                items,
                templates::updated_at,
                templates::id,
                page.order(),
                page.seek_timestamp()
            ),
            TemplateSort::CreatedAt => seek_and_order!(
                items,
                templates::created_at,
                templates::id,
                page.order(),
                page.seek_timestamp()
            ),
            TemplateSort::Name => seek_and_order!(
                items,
                templates::name,
                templates::id,
                page.order(),
                page.seek_text()
            ),
            TemplateSort::UsageCount => seek_and_order!(
                items,
                templates::usage_count,
                templates::id,
                page.order(),
                page.seek_integer()
            ),
        };

        let templates = items
            .limit(page.fetch_limit())
            .load::<DbTemplate>(&mut conn)?
            .into_iter()
            .map(Template::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(page.paginate(templates))
    }
}

impl TemplateWriter for DieselRepository {
    fn create_template(&self, new_template: &NewTemplate) -> RepositoryResult<Template> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let db_new_template = DbNewTemplate::from_domain(new_template, now());

        let db_template = diesel::insert_into(templates::table)
            .values(&db_new_template)
            .returning(DbTemplate::as_returning())
            .get_result::<DbTemplate>(&mut conn)?;

        Ok(Template::try_from(db_template)?)
    }

    fn update_template(
        &self,
        id: TemplateId,
        org_id: OrgId,
        updates: &UpdateTemplate,
    ) -> RepositoryResult<Template> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let changes = DbUpdateTemplate::from_domain(updates, now());

        let db_template = diesel::update(
            templates::table
                .filter(templates::id.eq(id.to_string()))
                .filter(templates::org_id.eq(org_id.to_string())),
        )
        .set(&changes)
        .returning(DbTemplate::as_returning())
        .get_result::<DbTemplate>(&mut conn)?;

        Ok(Template::try_from(db_template)?)
    }

    fn delete_template(&self, id: TemplateId, org_id: OrgId) -> RepositoryResult<Template> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            templates::table
                .filter(templates::id.eq(id.to_string()))
                .filter(templates::org_id.eq(org_id.to_string())),
        )
        .returning(DbTemplate::as_returning())
        .get_result::<DbTemplate>(&mut conn)?;

        Ok(Template::try_from(deleted)?)
    }

    fn record_template_use(&self, id: TemplateId, org_id: OrgId) -> RepositoryResult<Template> {
        use crate::schema::templates;

        let mut conn = self.conn()?;
        let db_template = diesel::update(
            templates::table
                .filter(templates::id.eq(id.to_string()))
                .filter(templates::org_id.eq(org_id.to_string())),
        )
        .set(templates::usage_count.eq(templates::usage_count + 1))
        .returning(DbTemplate::as_returning())
        .get_result::<DbTemplate>(&mut conn)?;

        Ok(Template::try_from(db_template)?)
    }
}

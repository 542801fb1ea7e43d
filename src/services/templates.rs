use crate::cache::{ListCache, ResourceKind};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::template::TemplateSort;
use crate::domain::types::TemplateId;
use crate::dto::templates::{TemplateDto, TemplateListParams};
use crate::forms::templates::{CreateTemplateForm, UpdateTemplateForm};
use crate::pagination::{Page, PageLimits};
use crate::repository::{TemplateListQuery, TemplateReader, TemplateWriter};
use crate::services::{
    ServiceError, ServiceResult, authorize, cached_page, plan_list, repository_failure,
};

fn parse_id(raw: &str) -> ServiceResult<TemplateId> {
    raw.parse().map_err(|_| ServiceError::NotFound)
}

pub fn list_templates<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    params: &TemplateListParams,
    limits: PageLimits,
) -> ServiceResult<Page<TemplateDto>>
where
    R: TemplateReader + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let (list, page) = plan_list::<TemplateSort>(&params.list, limits)?;
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let mut query = TemplateListQuery::new(org_id, page);
    if let Some(term) = &list.search {
        query = query.search(term.clone());
    }
    if let Some(category) = category {
        query = query.category(category);
    }

    let fingerprint = format!("{}&category={category:?}", list.fingerprint());
    let key = cache.key(org_id, ResourceKind::Templates, &fingerprint);
    cached_page(cache, key, || {
        let page = repo
            .list_templates(query)
            .map_err(repository_failure("list templates"))?;
        Ok(page.map(TemplateDto::from))
    })
}

pub fn get_template<R>(repo: &R, user: &AuthenticatedUser, id: &str) -> ServiceResult<TemplateDto>
where
    R: TemplateReader + ?Sized,
{
    let org_id = authorize(user)?;
    let template = repo
        .get_template_by_id(parse_id(id)?, org_id)
        .map_err(repository_failure("load template"))?
        .ok_or(ServiceError::NotFound)?;
    Ok(template.into())
}

pub fn create_template<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    form: CreateTemplateForm,
) -> ServiceResult<TemplateDto>
where
    R: TemplateWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let new_template = form.into_domain(org_id)?;
    let template = repo
        .create_template(&new_template)
        .map_err(repository_failure("create template"))?;
    cache.invalidate(org_id, ResourceKind::Templates);
    Ok(template.into())
}

pub fn update_template<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
    form: UpdateTemplateForm,
) -> ServiceResult<TemplateDto>
where
    R: TemplateWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let updates = form.into_domain()?;
    let template = repo
        .update_template(id, org_id, &updates)
        .map_err(repository_failure("update template"))?;
    cache.invalidate(org_id, ResourceKind::Templates);
    Ok(template.into())
}

pub fn delete_template<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
) -> ServiceResult<TemplateDto>
where
    R: TemplateWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let template = repo
        .delete_template(id, org_id)
        .map_err(repository_failure("delete template"))?;
    cache.invalidate(org_id, ResourceKind::Templates);
    Ok(template.into())
}

/// Counts one insertion of the template into a reply.
pub fn record_template_use<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
) -> ServiceResult<TemplateDto>
where
    R: TemplateWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let template = repo
        .record_template_use(id, org_id)
        .map_err(repository_failure("record template use"))?;
    cache.invalidate(org_id, ResourceKind::Templates);
    Ok(template.into())
}

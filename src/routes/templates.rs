use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::cache::MokaListCache;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::templates::TemplateListParams;
use crate::forms::templates::{CreateTemplateForm, UpdateTemplateForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, templates as templates_service};

#[get("/templates")]
pub async fn list_templates(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    server_config: web::Data<ServerConfig>,
    params: web::Query<TemplateListParams>,
) -> Result<HttpResponse, ServiceError> {
    let page = templates_service::list_templates(
        repo.get_ref(),
        cache.get_ref(),
        &user,
        &params,
        server_config.page_limits(),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/templates")]
pub async fn create_template(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    web::Json(form): web::Json<CreateTemplateForm>,
) -> Result<HttpResponse, ServiceError> {
    let template = templates_service::create_template(repo.get_ref(), cache.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(template))
}

#[get("/templates/{template_id}")]
pub async fn get_template(
    template_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let template = templates_service::get_template(repo.get_ref(), &user, &template_id)?;
    Ok(HttpResponse::Ok().json(template))
}

#[patch("/templates/{template_id}")]
pub async fn update_template(
    template_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    web::Json(form): web::Json<UpdateTemplateForm>,
) -> Result<HttpResponse, ServiceError> {
    let template = templates_service::update_template(
        repo.get_ref(),
        cache.get_ref(),
        &user,
        &template_id,
        form,
    )?;
    Ok(HttpResponse::Ok().json(template))
}

#[delete("/templates/{template_id}")]
pub async fn delete_template(
    template_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
) -> Result<HttpResponse, ServiceError> {
    let template =
        templates_service::delete_template(repo.get_ref(), cache.get_ref(), &user, &template_id)?;
    Ok(HttpResponse::Ok().json(template))
}

#[post("/templates/{template_id}/use")]
pub async fn record_template_use(
    template_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
) -> Result<HttpResponse, ServiceError> {
    let template =
        templates_service::record_template_use(repo.get_ref(), cache.get_ref(), &user, &template_id)?;
    Ok(HttpResponse::Ok().json(template))
}

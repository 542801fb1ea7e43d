use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::cache::MokaListCache;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::customers::CustomerListParams;
use crate::forms::customers::{CreateCustomerForm, UpdateCustomerForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, customers as customers_service};

#[get("/customers")]
pub async fn list_customers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    server_config: web::Data<ServerConfig>,
    params: web::Query<CustomerListParams>,
) -> Result<HttpResponse, ServiceError> {
    let page = customers_service::list_customers(
        repo.get_ref(),
        cache.get_ref(),
        &user,
        &params,
        server_config.page_limits(),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/customers")]
pub async fn create_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    web::Json(form): web::Json<CreateCustomerForm>,
) -> Result<HttpResponse, ServiceError> {
    let customer = customers_service::create_customer(repo.get_ref(), cache.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(customer))
}

#[get("/customers/{customer_id}")]
pub async fn get_customer(
    customer_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let customer = customers_service::get_customer(repo.get_ref(), &user, &customer_id)?;
    Ok(HttpResponse::Ok().json(customer))
}

#[patch("/customers/{customer_id}")]
pub async fn update_customer(
    customer_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    web::Json(form): web::Json<UpdateCustomerForm>,
) -> Result<HttpResponse, ServiceError> {
    let customer = customers_service::update_customer(
        repo.get_ref(),
        cache.get_ref(),
        &user,
        &customer_id,
        form,
    )?;
    Ok(HttpResponse::Ok().json(customer))
}

#[delete("/customers/{customer_id}")]
pub async fn delete_customer(
    customer_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
) -> Result<HttpResponse, ServiceError> {
    let customer =
        customers_service::delete_customer(repo.get_ref(), cache.get_ref(), &user, &customer_id)?;
    Ok(HttpResponse::Ok().json(customer))
}

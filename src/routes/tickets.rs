use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::cache::MokaListCache;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::tickets::TicketListParams;
use crate::forms::tickets::{CreateTicketForm, UpdateTicketForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, tickets as tickets_service};

#[get("/tickets")]
pub async fn list_tickets(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    server_config: web::Data<ServerConfig>,
    params: web::Query<TicketListParams>,
) -> Result<HttpResponse, ServiceError> {
    let page = tickets_service::list_tickets(
        repo.get_ref(),
        cache.get_ref(),
        &user,
        &params,
        server_config.page_limits(),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/tickets")]
pub async fn create_ticket(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    web::Json(form): web::Json<CreateTicketForm>,
) -> Result<HttpResponse, ServiceError> {
    let ticket = tickets_service::create_ticket(repo.get_ref(), cache.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(ticket))
}

#[get("/tickets/{ticket_id}")]
pub async fn get_ticket(
    ticket_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let ticket = tickets_service::get_ticket(repo.get_ref(), &user, &ticket_id)?;
    Ok(HttpResponse::Ok().json(ticket))
}

#[patch("/tickets/{ticket_id}")]
pub async fn update_ticket(
    ticket_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    web::Json(form): web::Json<UpdateTicketForm>,
) -> Result<HttpResponse, ServiceError> {
    let ticket =
        tickets_service::update_ticket(repo.get_ref(), cache.get_ref(), &user, &ticket_id, form)?;
    Ok(HttpResponse::Ok().json(ticket))
}

/// Tickets are never removed; `DELETE` archives and returns the ticket.
#[delete("/tickets/{ticket_id}")]
pub async fn archive_ticket(
    ticket_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
) -> Result<HttpResponse, ServiceError> {
    let ticket = tickets_service::archive_ticket(repo.get_ref(), cache.get_ref(), &user, &ticket_id)?;
    Ok(HttpResponse::Ok().json(ticket))
}

#[post("/tickets/{ticket_id}/restore")]
pub async fn restore_ticket(
    ticket_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
) -> Result<HttpResponse, ServiceError> {
    let ticket = tickets_service::restore_ticket(repo.get_ref(), cache.get_ref(), &user, &ticket_id)?;
    Ok(HttpResponse::Ok().json(ticket))
}

#[get("/tickets/{ticket_id}/ai")]
pub async fn get_ticket_ai(
    ticket_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let metadata = tickets_service::get_ticket_ai(repo.get_ref(), &user, &ticket_id)?;
    Ok(HttpResponse::Ok().json(metadata))
}

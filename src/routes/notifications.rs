use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::cache::MokaListCache;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::notifications::NotificationListParams;
use crate::forms::notifications::{CreateNotificationForm, UpdateNotificationForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, notifications as notifications_service};

#[get("/notifications")]
pub async fn list_notifications(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    server_config: web::Data<ServerConfig>,
    params: web::Query<NotificationListParams>,
) -> Result<HttpResponse, ServiceError> {
    let page = notifications_service::list_notifications(
        repo.get_ref(),
        cache.get_ref(),
        &user,
        &params,
        server_config.page_limits(),
    )?;
    Ok(HttpResponse::Ok().json(page))
}

#[post("/notifications")]
pub async fn create_notification(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    web::Json(form): web::Json<CreateNotificationForm>,
) -> Result<HttpResponse, ServiceError> {
    let notification =
        notifications_service::create_notification(repo.get_ref(), cache.get_ref(), &user, form)?;
    Ok(HttpResponse::Created().json(notification))
}

#[post("/notifications/read-all")]
pub async fn mark_all_notifications_read(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
) -> Result<HttpResponse, ServiceError> {
    let count =
        notifications_service::mark_all_notifications_read(repo.get_ref(), cache.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(count))
}

#[patch("/notifications/{notification_id}")]
pub async fn update_notification(
    notification_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
    web::Json(form): web::Json<UpdateNotificationForm>,
) -> Result<HttpResponse, ServiceError> {
    let notification = notifications_service::set_notification_read(
        repo.get_ref(),
        cache.get_ref(),
        &user,
        &notification_id,
        form,
    )?;
    Ok(HttpResponse::Ok().json(notification))
}

#[delete("/notifications/{notification_id}")]
pub async fn delete_notification(
    notification_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<MokaListCache>,
) -> Result<HttpResponse, ServiceError> {
    let notification = notifications_service::delete_notification(
        repo.get_ref(),
        cache.get_ref(),
        &user,
        &notification_id,
    )?;
    Ok(HttpResponse::Ok().json(notification))
}

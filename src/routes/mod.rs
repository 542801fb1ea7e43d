//! HTTP surface mounted under `/api/v1`.
//!
//! Handlers extract the caller, hand the request to a service and serialize
//! the result. Every failure, including malformed JSON bodies and query
//! strings, is rendered as the common error envelope.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, error, web};

use crate::dto::ErrorEnvelope;
use crate::services::ServiceError;

pub mod customers;
pub mod notifications;
pub mod templates;
pub mod tickets;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::Validation { .. } | ServiceError::InvalidCursor(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let envelope = match self {
            ServiceError::Validation { message, details } => {
                ErrorEnvelope::new(self.code(), message.clone(), details.clone())
            }
            ServiceError::Internal(cause) => {
                log::error!("Request failed: {cause}");
                ErrorEnvelope::new(self.code(), "internal server error", None)
            }
            other => ErrorEnvelope::new(other.code(), other.to_string(), None),
        };
        HttpResponse::build(self.status_code()).json(envelope)
    }
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ServiceError::validation(format!("invalid request body: {err}")).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ServiceError::validation(format!("invalid query string: {err}")).into()
}

/// Extractor settings that render payload errors as the error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(json_error)
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

/// Registers every resource under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(customers::list_customers)
            .service(customers::create_customer)
            .service(customers::get_customer)
            .service(customers::update_customer)
            .service(customers::delete_customer)
            .service(tickets::list_tickets)
            .service(tickets::create_ticket)
            .service(tickets::get_ticket)
            .service(tickets::update_ticket)
            .service(tickets::archive_ticket)
            .service(tickets::restore_ticket)
            .service(tickets::get_ticket_ai)
            .service(templates::list_templates)
            .service(templates::create_template)
            .service(templates::get_template)
            .service(templates::update_template)
            .service(templates::delete_template)
            .service(templates::record_template_use)
            .service(notifications::list_notifications)
            .service(notifications::create_notification)
            .service(notifications::mark_all_notifications_read)
            .service(notifications::update_notification)
            .service(notifications::delete_notification),
    );
}

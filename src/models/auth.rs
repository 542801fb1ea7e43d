//! Bearer token extraction for authenticated requests.

use std::future::{Ready, ready};

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::services::errors::ServiceError;

/// Verifies an HS256 token and returns its claims.
pub fn decode_token(token: &str, secret: &str) -> Result<AuthenticatedUser, ServiceError> {
    decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        log::debug!("Rejected bearer token: {err}");
        ServiceError::Unauthorized
    })
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequest for AuthenticatedUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("ServerConfig is not registered as app data");
            return ready(Err(ServiceError::Internal(
                "missing server configuration".to_string(),
            )));
        };
        let result = match bearer_token(req) {
            Some(token) => decode_token(token, &config.secret),
            None => Err(ServiceError::Unauthorized),
        };
        ready(result)
    }
}

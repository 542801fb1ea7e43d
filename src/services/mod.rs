//! Business logic behind the HTTP handlers.
//!
//! Services are generic over the repository traits they need so they can be
//! exercised with mocks. Each one authorizes the caller, validates input before
//! touching the datastore, and keeps the list cache coherent.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::SERVICE_ACCESS_ROLE;
use crate::cache::{CacheKey, ListCache};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{OrgId, TypeConstraintError};
use crate::pagination::{KeysetQuery, ListParams, Page, PageLimits, RawListParams, SortKey};
use crate::repository::errors::RepositoryError;

pub mod customers;
pub mod errors;
pub mod notifications;
pub mod templates;
pub mod tickets;

pub use errors::{ConflictCode, ServiceError, ServiceResult};

/// Checks the caller's role and returns the organization it acts for.
pub fn authorize(user: &AuthenticatedUser) -> ServiceResult<OrgId> {
    if !user.has_role(SERVICE_ACCESS_ROLE) {
        return Err(ServiceError::Forbidden);
    }
    user.org_id().map_err(|_| ServiceError::Unauthorized)
}

/// Normalized parameters plus the keyset plan they describe.
pub(crate) fn plan_list<S: SortKey>(
    raw: &RawListParams,
    limits: PageLimits,
) -> ServiceResult<(ListParams<S>, KeysetQuery<S>)> {
    let params = ListParams::<S>::parse(raw, limits)?;
    let page = KeysetQuery::new(params.sort, params.order, params.limit, params.cursor.as_ref())?;
    Ok((params, page))
}

/// Parses an optional filter value, rejecting anything unrecognized.
pub(crate) fn parse_filter<T>(raw: Option<&str>, name: &str) -> ServiceResult<Option<T>>
where
    T: std::str::FromStr<Err = TypeConstraintError>,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|err| ServiceError::validation(format!("invalid {name} filter: {err}"))),
        None => Ok(None),
    }
}

/// Parses a `true`/`false` query flag.
pub(crate) fn parse_flag(raw: Option<&str>, name: &str) -> ServiceResult<Option<bool>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(ServiceError::validation(format!(
            "invalid {name} filter: expected true or false, got `{other}`"
        ))),
        None => Ok(None),
    }
}

/// Logs failures the caller cannot act on and converts the error.
pub(crate) fn repository_failure(action: &'static str) -> impl Fn(RepositoryError) -> ServiceError {
    move |err| {
        if err.is_constraint() {
            log::warn!("Constraint rejected {action}: {err}");
        } else if err != RepositoryError::NotFound {
            log::error!("Failed to {action}: {err}");
        }
        ServiceError::from(err)
    }
}

/// Serves a page from the cache, loading and storing it on a miss.
pub(crate) fn cached_page<C, T, F>(cache: &C, key: CacheKey, load: F) -> ServiceResult<Page<T>>
where
    C: ListCache + ?Sized,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> ServiceResult<Page<T>>,
{
    if let Some(value) = cache.get(&key) {
        match serde_json::from_value(value) {
            Ok(page) => return Ok(page),
            Err(err) => log::warn!("Discarding unreadable cached page {}: {err}", key.as_str()),
        }
    }
    let page = load()?;
    match serde_json::to_value(&page) {
        Ok(value) => cache.put(key, value),
        Err(err) => log::warn!("Failed to cache page {}: {err}", key.as_str()),
    }
    Ok(page)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use crate::SERVICE_ACCESS_ROLE;
    use crate::cache::MokaListCache;
    use crate::domain::auth::AuthenticatedUser;
    use crate::domain::types::OrgId;

    pub const ORG: &str = "3f0f1c3e-6f5e-4c36-9a53-0f2f4a0b7a11";

    pub fn org() -> OrgId {
        ORG.parse().unwrap()
    }

    pub fn agent() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "agent-1".to_string(),
            email: "agent@example.com".to_string(),
            name: "Agent".to_string(),
            org_id: ORG.to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    pub fn outsider() -> AuthenticatedUser {
        AuthenticatedUser {
            roles: vec!["billing".to_string()],
            ..agent()
        }
    }

    pub fn cache() -> MokaListCache {
        MokaListCache::new(Duration::from_secs(60), 100)
    }
}

//! Agent notifications. Reading state is a nullable `read_at` timestamp.

use serde_json::json;

use crate::cache::{ListCache, ResourceKind};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::notification::NotificationSort;
use crate::domain::types::{NotificationId, now};
use crate::dto::UpdatedCount;
use crate::dto::notifications::{NotificationDto, NotificationListParams};
use crate::forms::notifications::{CreateNotificationForm, UpdateNotificationForm};
use crate::pagination::{Page, PageLimits};
use crate::repository::{
    NotificationListQuery, NotificationReader, NotificationWriter, TicketReader,
};
use crate::services::{
    ServiceError, ServiceResult, authorize, cached_page, parse_flag, plan_list,
    repository_failure,
};

fn parse_id(raw: &str) -> ServiceResult<NotificationId> {
    raw.parse().map_err(|_| ServiceError::NotFound)
}

pub fn list_notifications<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    params: &NotificationListParams,
    limits: PageLimits,
) -> ServiceResult<Page<NotificationDto>>
where
    R: NotificationReader + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let (list, page) = plan_list::<NotificationSort>(&params.list, limits)?;
    let unread_only = parse_flag(params.unread_only.as_deref(), "unreadOnly")?.unwrap_or(false);

    let query = NotificationListQuery::new(org_id, page).unread_only(unread_only);
    let fingerprint = format!("{}&unread={unread_only}", list.fingerprint());
    let key = cache.key(org_id, ResourceKind::Notifications, &fingerprint);
    cached_page(cache, key, || {
        let page = repo
            .list_notifications(query)
            .map_err(repository_failure("list notifications"))?;
        Ok(page.map(NotificationDto::from))
    })
}

pub fn create_notification<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    form: CreateNotificationForm,
) -> ServiceResult<NotificationDto>
where
    R: NotificationWriter + TicketReader + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let new_notification = form.into_domain(org_id)?;

    if let Some(ticket_id) = new_notification.ticket_id {
        let ticket = repo
            .get_ticket_by_id(ticket_id, org_id)
            .map_err(repository_failure("load ticket"))?;
        if ticket.is_none() {
            return Err(ServiceError::Validation {
                message: "unknown ticket".to_string(),
                details: Some(json!({ "ticketId": [ticket_id.to_string()] })),
            });
        }
    }

    let notification = repo
        .create_notification(&new_notification)
        .map_err(repository_failure("create notification"))?;
    cache.invalidate(org_id, ResourceKind::Notifications);
    Ok(notification.into())
}

/// Marks a notification read (`read: true`) or unread again.
pub fn set_notification_read<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
    form: UpdateNotificationForm,
) -> ServiceResult<NotificationDto>
where
    R: NotificationWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let read_at = form.read.then(now);
    let notification = repo
        .set_notification_read_at(id, org_id, read_at)
        .map_err(repository_failure("update notification"))?;
    cache.invalidate(org_id, ResourceKind::Notifications);
    Ok(notification.into())
}

pub fn mark_all_notifications_read<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
) -> ServiceResult<UpdatedCount>
where
    R: NotificationWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let updated = repo
        .mark_all_notifications_read(org_id, now())
        .map_err(repository_failure("mark notifications read"))?;
    if updated > 0 {
        cache.invalidate(org_id, ResourceKind::Notifications);
    }
    Ok(UpdatedCount { updated })
}

pub fn delete_notification<R, C>(
    repo: &R,
    cache: &C,
    user: &AuthenticatedUser,
    id: &str,
) -> ServiceResult<NotificationDto>
where
    R: NotificationWriter + ?Sized,
    C: ListCache + ?Sized,
{
    let org_id = authorize(user)?;
    let id = parse_id(id)?;
    let notification = repo
        .delete_notification(id, org_id)
        .map_err(repository_failure("delete notification"))?;
    cache.invalidate(org_id, ResourceKind::Notifications);
    Ok(notification.into())
}

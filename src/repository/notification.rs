//! Repository implementation for agent notifications.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        notification::{NewNotification, Notification, NotificationSort},
        types::{NotificationId, OrgId, now},
    },
    models::notification::{NewNotification as DbNewNotification, Notification as DbNotification},
    pagination::Page,
    repository::{
        DieselRepository, NotificationListQuery, NotificationReader, NotificationWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl NotificationReader for DieselRepository {
    fn list_notifications(
        &self,
        query: NotificationListQuery,
    ) -> RepositoryResult<Page<Notification>> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let page = &query.page;
        log::debug!("Listing notifications of {}: {page}", query.org_id);

        let mut items = notifications::table
            .filter(notifications::org_id.eq(query.org_id.to_string()))
            .select(DbNotification::as_select())
            .into_boxed::<Sqlite>();

        if query.unread_only {
            items = items.filter(notifications::read_at.is_null());
        }

        let items = match page.sort() {
            NotificationSort::CreatedAt => seek_and_order!(
                items,
                notifications::created_at,
                notifications::id,
                page.order(),
                page.seek_timestamp()
            ),
        };

        let notifications = items
            .limit(page.fetch_limit())
            .load::<DbNotification>(&mut conn)?
            .into_iter()
            .map(Notification::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(page.paginate(notifications))
    }
}

impl NotificationWriter for DieselRepository {
    fn create_notification(
        &self,
        new_notification: &NewNotification,
    ) -> RepositoryResult<Notification> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let db_new_notification = DbNewNotification::from_domain(new_notification, now());

        let db_notification = diesel::insert_into(notifications::table)
            .values(&db_new_notification)
            .returning(DbNotification::as_returning())
            .get_result::<DbNotification>(&mut conn)?;

        Ok(Notification::try_from(db_notification)?)
    }

    fn set_notification_read_at(
        &self,
        id: NotificationId,
        org_id: OrgId,
        read_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Notification> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let db_notification = conn.transaction::<_, RepositoryError, _>(|conn| {
            let target = notifications::table
                .filter(notifications::id.eq(id.to_string()))
                .filter(notifications::org_id.eq(org_id.to_string()));

            match read_at {
                // An already read notification keeps its first read time.
                Some(read_at) => {
                    let unread = target.clone().filter(notifications::read_at.is_null());
                    let marked = diesel::update(unread)
                        .set(notifications::read_at.eq(Some(read_at)))
                        .returning(DbNotification::as_returning())
                        .get_result::<DbNotification>(conn)
                        .optional()?;
                    match marked {
                        Some(row) => Ok(row),
                        None => Ok(target
                            .select(DbNotification::as_select())
                            .first::<DbNotification>(conn)?),
                    }
                }
                None => Ok(diesel::update(target)
                    .set(notifications::read_at.eq(None::<NaiveDateTime>))
                    .returning(DbNotification::as_returning())
                    .get_result::<DbNotification>(conn)?),
            }
        })?;

        Ok(Notification::try_from(db_notification)?)
    }

    fn mark_all_notifications_read(
        &self,
        org_id: OrgId,
        read_at: NaiveDateTime,
    ) -> RepositoryResult<usize> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            notifications::table
                .filter(notifications::org_id.eq(org_id.to_string()))
                .filter(notifications::read_at.is_null()),
        )
        .set(notifications::read_at.eq(Some(read_at)))
        .execute(&mut conn)?;

        Ok(updated)
    }

    fn delete_notification(
        &self,
        id: NotificationId,
        org_id: OrgId,
    ) -> RepositoryResult<Notification> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            notifications::table
                .filter(notifications::id.eq(id.to_string()))
                .filter(notifications::org_id.eq(org_id.to_string())),
        )
        .returning(DbNotification::as_returning())
        .get_result::<DbNotification>(&mut conn)?;

        Ok(Notification::try_from(deleted)?)
    }
}

//! Repository implementation for support tickets.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        ticket::{NewTicket, Ticket, TicketSort, UpdateTicket},
        types::{OrgId, TicketId, now},
    },
    models::ticket::{
        NewTicket as DbNewTicket, Ticket as DbTicket, UpdateTicket as DbUpdateTicket,
    },
    pagination::{Page, like_pattern},
    repository::{
        DieselRepository, TicketListQuery, TicketReader, TicketWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl TicketReader for DieselRepository {
    fn get_ticket_by_id(&self, id: TicketId, org_id: OrgId) -> RepositoryResult<Option<Ticket>> {
        use crate::schema::tickets;

        let mut conn = self.conn()?;
        let db_ticket = tickets::table
            .filter(tickets::id.eq(id.to_string()))
            .filter(tickets::org_id.eq(org_id.to_string()))
            .select(DbTicket::as_select())
            .first::<DbTicket>(&mut conn)
            .optional()?;

        match db_ticket {
            Some(db_ticket) => Ok(Some(
                Ticket::try_from(db_ticket).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<Page<Ticket>> {
        use crate::schema::tickets;

        let mut conn = self.conn()?;
        let page = &query.page;
        log::debug!("Listing tickets of {}: {page}", query.org_id);

        let mut items = tickets::table
            .filter(tickets::org_id.eq(query.org_id.to_string()))
            .select(DbTicket::as_select())
            .into_boxed::<Sqlite>();

        items = if query.archived {
            items.filter(tickets::archived_at.is_not_null())
        } else {
            items.filter(tickets::archived_at.is_null())
        };

        if let Some(status) = query.status {
            items = items.filter(tickets::status.eq(status.as_str()));
        }

        if let Some(priority) = query.priority {
            items = items.filter(tickets::priority.eq(priority.as_str()));
        }

        if let Some(customer_id) = query.customer_id {
            items = items.filter(tickets::customer_id.eq(customer_id.to_string()));
        }

        if let Some(term) = &query.search {
            items = items.filter(tickets::subject.like(like_pattern(term)).escape('\\'));
        }

        let items = match page.sort() {
            TicketSort::CreatedAt => seek_and_order!(
                items,
                tickets::created_at,
                tickets::id,
                page.order(),
                page.seek_timestamp()
            ),
            TicketSort::UpdatedAt => seek_and_order!(
                items,
                tickets::updated_at,
                tickets::id,
                page.order(),
                page.seek_timestamp()
            ),
            TicketSort::Subject => seek_and_order!(
                items,
                tickets::subject,
                tickets::id,
                page.order(),
                page.seek_text()
            ),
        };

        let tickets = items
            .limit(page.fetch_limit())
            .load::<DbTicket>(&mut conn)?
            .into_iter()
            .map(Ticket::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(page.paginate(tickets))
    }
}

impl TicketWriter for DieselRepository {
    fn create_ticket(&self, new_ticket: &NewTicket) -> RepositoryResult<Ticket> {
        use crate::schema::tickets;

        let mut conn = self.conn()?;
        let db_new_ticket = DbNewTicket::from_domain(new_ticket, now());

        let db_ticket = diesel::insert_into(tickets::table)
            .values(&db_new_ticket)
            .returning(DbTicket::as_returning())
            .get_result::<DbTicket>(&mut conn)?;

        Ok(Ticket::try_from(db_ticket)?)
    }

    fn update_ticket(
        &self,
        id: TicketId,
        org_id: OrgId,
        updates: &UpdateTicket,
    ) -> RepositoryResult<Ticket> {
        use crate::schema::tickets;

        let mut conn = self.conn()?;
        let changes = DbUpdateTicket::from_domain(updates, now());

        let db_ticket = diesel::update(
            tickets::table
                .filter(tickets::id.eq(id.to_string()))
                .filter(tickets::org_id.eq(org_id.to_string())),
        )
        .set(&changes)
        .returning(DbTicket::as_returning())
        .get_result::<DbTicket>(&mut conn)?;

        Ok(Ticket::try_from(db_ticket)?)
    }
}

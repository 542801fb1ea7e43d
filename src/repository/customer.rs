//! Repository implementation for customers.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        customer::{Customer, CustomerSort, NewCustomer, UpdateCustomer},
        types::{CustomerId, OrgId, now},
    },
    models::customer::{
        Customer as DbCustomer, NewCustomer as DbNewCustomer, UpdateCustomer as DbUpdateCustomer,
    },
    pagination::{Page, like_pattern},
    repository::{
        CustomerListQuery, CustomerReader, CustomerWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(
        &self,
        id: CustomerId,
        org_id: OrgId,
    ) -> RepositoryResult<Option<Customer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let db_customer = customers::table
            .filter(customers::id.eq(id.to_string()))
            .filter(customers::org_id.eq(org_id.to_string()))
            .select(DbCustomer::as_select())
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        match db_customer {
            Some(db_customer) => Ok(Some(
                Customer::try_from(db_customer).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Page<Customer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let page = &query.page;
        log::debug!("Listing customers of {}: {page}", query.org_id);

        let mut items = customers::table
            .filter(customers::org_id.eq(query.org_id.to_string()))
            .select(DbCustomer::as_select())
            .into_boxed::<Sqlite>();

        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            items = items.filter(
                customers::name
                    .like(pattern.clone())
                    .escape('\\')
                    .or(customers::email.like(pattern).escape('\\')),
            );
        }

        let items = match page.sort() {
            CustomerSort::CreatedAt => seek_and_order!(
                items,
                customers::created_at,
                customers::id,
                page.order(),
                page.seek_timestamp()
            ),
            CustomerSort::UpdatedAt => seek_and_order!(
                items,
                customers::updated_at,
                customers::id,
                page.order(),
                page.seek_timestamp()
            ),
            CustomerSort::Name => seek_and_order!(
                items,
                customers::name,
                customers::id,
                page.order(),
                page.seek_text()
            ),
            CustomerSort::Email => seek_and_order!(
                items,
                customers::email,
                customers::id,
                page.order(),
                page.seek_text()
            ),
        };

        let customers = items
            .limit(page.fetch_limit())
            .load::<DbCustomer>(&mut conn)?
            .into_iter()
            .map(Customer::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(page.paginate(customers))
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let db_new_customer = DbNewCustomer::from_domain(new_customer, now());

        let db_customer = diesel::insert_into(customers::table)
            .values(&db_new_customer)
            .returning(DbCustomer::as_returning())
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(Customer::try_from(db_customer)?)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        org_id: OrgId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let changes = DbUpdateCustomer::from_domain(updates, now());

        let db_customer = diesel::update(
            customers::table
                .filter(customers::id.eq(id.to_string()))
                .filter(customers::org_id.eq(org_id.to_string())),
        )
        .set(&changes)
        .returning(DbCustomer::as_returning())
        .get_result::<DbCustomer>(&mut conn)?;

        Ok(Customer::try_from(db_customer)?)
    }

    fn delete_customer(&self, id: CustomerId, org_id: OrgId) -> RepositoryResult<Customer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            customers::table
                .filter(customers::id.eq(id.to_string()))
                .filter(customers::org_id.eq(org_id.to_string())),
        )
        .returning(DbCustomer::as_returning())
        .get_result::<DbCustomer>(&mut conn)?;

        Ok(Customer::try_from(deleted)?)
    }
}

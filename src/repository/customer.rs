//! Repository implementation for customers.

use diesel::{Connection, prelude::*};

use crate::{
    domain::{
        customer::{Customer, NewCustomer},
        types::{CustomerId, UserId},
    },
    models::customer::{Customer as DbCustomer, NewCustomer as DbNewCustomer},
    repository::{
        CustomerListQuery, CustomerReader, CustomerWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(
        &self,
        id: CustomerId,
        user_id: &UserId,
    ) -> RepositoryResult<Option<Customer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let db_customer = customers::table
            .filter(customers::id.eq(id.get()))
            .filter(customers::user_id.eq(user_id.as_str()))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        db_customer
            .map(|c| Customer::try_from(c).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<Customer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let mut items = customers::table
            .filter(customers::user_id.eq(query.user_id.as_str()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(search) = &query.search {
            let pattern = format!("%{}%", escape_like(search));
            items = items.filter(
                customers::name
                    .like(pattern.clone())
                    .escape('\\')
                    .or(customers::email.like(pattern.clone()).escape('\\'))
                    .or(customers::phone.like(pattern.clone()).escape('\\'))
                    .or(customers::address.like(pattern).escape('\\')),
            );
        }

        items
            .order((customers::created_at.desc(), customers::id.desc()))
            .load::<DbCustomer>(&mut conn)?
            .into_iter()
            .map(|c| Customer::try_from(c).map_err(RepositoryError::from))
            .collect()
    }
}

/// Makes `%` and `_` in user input match literally.
fn escape_like(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len());
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl CustomerWriter for DieselRepository {
    fn create_customers(&self, new_customers: &[NewCustomer]) -> RepositoryResult<Vec<Customer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let stored = conn.transaction::<Vec<DbCustomer>, diesel::result::Error, _>(|conn| {
            new_customers
                .iter()
                .map(|customer| {
                    diesel::insert_into(customers::table)
                        .values(DbNewCustomer::from(customer))
                        .get_result::<DbCustomer>(conn)
                })
                .collect()
        })?;

        stored
            .into_iter()
            .map(|c| Customer::try_from(c).map_err(RepositoryError::from))
            .collect()
    }
}

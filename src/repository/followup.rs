//! Repository implementation for follow-ups.

use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::{
        customer::{Customer, CustomerSummary},
        followup::{Followup, FollowupWithRelations, NewFollowup, UpdateFollowupStatus},
        payment::{Payment, PaymentSummary},
        types::{FollowupId, UserId},
    },
    models::{
        customer::Customer as DbCustomer,
        followup::{
            Followup as DbFollowup, NewFollowup as DbNewFollowup,
            UpdateFollowupStatus as DbUpdateFollowupStatus,
        },
        payment::Payment as DbPayment,
    },
    repository::{
        DieselRepository, FollowupReader, FollowupWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

/// Loads the customers and payments referenced by `db_followups` and
/// attaches their summaries.
fn with_relations(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    db_followups: Vec<DbFollowup>,
) -> RepositoryResult<Vec<FollowupWithRelations>> {
    use crate::schema::{customers, payments};

    let customer_ids: Vec<i32> = db_followups.iter().map(|f| f.customer_id).collect();
    let payment_ids: Vec<i32> = db_followups.iter().filter_map(|f| f.payment_id).collect();

    let customer_map = customers::table
        .filter(customers::id.eq_any(customer_ids))
        .filter(customers::user_id.eq(user_id.as_str()))
        .load::<DbCustomer>(conn)?
        .into_iter()
        .map(|c| {
            let customer = Customer::try_from(c)?;
            Ok((customer.id.get(), CustomerSummary::from(&customer)))
        })
        .collect::<Result<HashMap<i32, CustomerSummary>, RepositoryError>>()?;

    let payment_map = payments::table
        .filter(payments::id.eq_any(payment_ids))
        .filter(payments::user_id.eq(user_id.as_str()))
        .load::<DbPayment>(conn)?
        .into_iter()
        .map(|p| {
            let payment = Payment::try_from(p)?;
            Ok((payment.id.get(), PaymentSummary::from(&payment)))
        })
        .collect::<Result<HashMap<i32, PaymentSummary>, RepositoryError>>()?;

    db_followups
        .into_iter()
        .map(|db_followup| {
            let customer = customer_map.get(&db_followup.customer_id).cloned();
            let payment = db_followup
                .payment_id
                .and_then(|id| payment_map.get(&id).cloned());
            let followup = Followup::try_from(db_followup)?;
            Ok(FollowupWithRelations {
                followup,
                customer,
                payment,
            })
        })
        .collect()
}

impl FollowupReader for DieselRepository {
    fn get_followup_by_id(
        &self,
        id: FollowupId,
        user_id: &UserId,
    ) -> RepositoryResult<Option<FollowupWithRelations>> {
        use crate::schema::followups;

        let mut conn = self.conn()?;
        let db_followups = followups::table
            .filter(followups::id.eq(id.get()))
            .filter(followups::user_id.eq(user_id.as_str()))
            .load::<DbFollowup>(&mut conn)?;

        Ok(with_relations(&mut conn, user_id, db_followups)?
            .into_iter()
            .next())
    }

    fn list_followups(&self, user_id: &UserId) -> RepositoryResult<Vec<FollowupWithRelations>> {
        use crate::schema::followups;

        let mut conn = self.conn()?;
        let db_followups = followups::table
            .filter(followups::user_id.eq(user_id.as_str()))
            .order((followups::scheduled_date.asc(), followups::id.asc()))
            .load::<DbFollowup>(&mut conn)?;

        with_relations(&mut conn, user_id, db_followups)
    }
}

impl FollowupWriter for DieselRepository {
    fn create_followup(&self, new_followup: &NewFollowup) -> RepositoryResult<Followup> {
        use crate::schema::followups;

        let mut conn = self.conn()?;
        let db_followup = diesel::insert_into(followups::table)
            .values(DbNewFollowup::from(new_followup))
            .get_result::<DbFollowup>(&mut conn)?;

        Followup::try_from(db_followup).map_err(RepositoryError::from)
    }

    fn update_followup_status(
        &self,
        id: FollowupId,
        user_id: &UserId,
        update: &UpdateFollowupStatus,
    ) -> RepositoryResult<Followup> {
        use crate::schema::followups;

        let mut conn = self.conn()?;
        let changes = DbUpdateFollowupStatus::new(update, Utc::now().naive_utc());

        let db_followup = diesel::update(
            followups::table
                .filter(followups::id.eq(id.get()))
                .filter(followups::user_id.eq(user_id.as_str())),
        )
        .set(&changes)
        .get_result::<DbFollowup>(&mut conn)?;

        Followup::try_from(db_followup).map_err(RepositoryError::from)
    }
}

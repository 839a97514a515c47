//! Repository implementation for payments.

use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        customer::{Customer, CustomerSummary},
        payment::{NewPayment, Payment, PaymentWithCustomer, UpdatePaymentStatus},
        types::{PaymentId, UserId},
    },
    models::{
        customer::Customer as DbCustomer,
        payment::{
            NewPayment as DbNewPayment, Payment as DbPayment,
            UpdatePaymentStatus as DbUpdatePaymentStatus,
        },
    },
    repository::{
        DieselRepository, PaymentReader, PaymentWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl PaymentReader for DieselRepository {
    fn get_payment_by_id(
        &self,
        id: PaymentId,
        user_id: &UserId,
    ) -> RepositoryResult<Option<Payment>> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let db_payment = payments::table
            .filter(payments::id.eq(id.get()))
            .filter(payments::user_id.eq(user_id.as_str()))
            .first::<DbPayment>(&mut conn)
            .optional()?;

        db_payment
            .map(|p| Payment::try_from(p).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_payments(&self, user_id: &UserId) -> RepositoryResult<Vec<PaymentWithCustomer>> {
        use crate::schema::{customers, payments};

        let mut conn = self.conn()?;

        let db_payments = payments::table
            .filter(payments::user_id.eq(user_id.as_str()))
            .order((payments::created_at.desc(), payments::id.desc()))
            .load::<DbPayment>(&mut conn)?;

        let mut customer_ids: Vec<i32> = db_payments.iter().map(|p| p.customer_id).collect();
        customer_ids.sort_unstable();
        customer_ids.dedup();

        let customer_map = customers::table
            .filter(customers::id.eq_any(customer_ids))
            .filter(customers::user_id.eq(user_id.as_str()))
            .load::<DbCustomer>(&mut conn)?
            .into_iter()
            .map(|c| {
                let customer = Customer::try_from(c)?;
                Ok((customer.id.get(), CustomerSummary::from(&customer)))
            })
            .collect::<Result<HashMap<i32, CustomerSummary>, RepositoryError>>()?;

        db_payments
            .into_iter()
            .map(|db_payment| {
                let customer = customer_map.get(&db_payment.customer_id).cloned();
                let payment = Payment::try_from(db_payment)?;
                Ok(PaymentWithCustomer { payment, customer })
            })
            .collect()
    }
}

impl PaymentWriter for DieselRepository {
    fn create_payment(&self, new_payment: &NewPayment) -> RepositoryResult<Payment> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let db_payment = diesel::insert_into(payments::table)
            .values(DbNewPayment::from(new_payment))
            .get_result::<DbPayment>(&mut conn)?;

        Payment::try_from(db_payment).map_err(RepositoryError::from)
    }

    fn update_payment_status(
        &self,
        id: PaymentId,
        user_id: &UserId,
        update: &UpdatePaymentStatus,
    ) -> RepositoryResult<Payment> {
        use crate::schema::payments;

        let mut conn = self.conn()?;
        let changes = DbUpdatePaymentStatus::new(update, Utc::now().naive_utc());

        let db_payment = diesel::update(
            payments::table
                .filter(payments::id.eq(id.get()))
                .filter(payments::user_id.eq(user_id.as_str())),
        )
        .set(&changes)
        .get_result::<DbPayment>(&mut conn)?;

        Payment::try_from(db_payment).map_err(RepositoryError::from)
    }
}

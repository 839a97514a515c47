use crate::{
    db::{DbConnection, DbPool},
    domain::{
        customer::{Customer, NewCustomer},
        followup::{Followup, FollowupWithRelations, NewFollowup, UpdateFollowupStatus},
        payment::{NewPayment, Payment, PaymentWithCustomer, UpdatePaymentStatus},
        profile::{Profile, UpsertProfile},
        types::{CustomerId, FollowupId, PaymentId, UserId},
    },
    repository::errors::RepositoryResult,
};

pub mod customer;
pub mod errors;
pub mod followup;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod payment;
pub mod profile;

/// Diesel-backed repository shared by every handler.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone)]
pub struct CustomerListQuery {
    pub user_id: UserId,
    pub search: Option<String>,
}

impl CustomerListQuery {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            search: None,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let search = search.trim();
        if !search.is_empty() {
            self.search = Some(search.to_string());
        }
        self
    }
}

pub trait CustomerReader {
    fn get_customer_by_id(
        &self,
        id: CustomerId,
        user_id: &UserId,
    ) -> RepositoryResult<Option<Customer>>;
    /// Customers newest first.
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<Customer>>;
}

pub trait CustomerWriter {
    /// Inserts all customers in one transaction and returns the stored rows.
    fn create_customers(&self, new_customers: &[NewCustomer]) -> RepositoryResult<Vec<Customer>>;
}

pub trait PaymentReader {
    fn get_payment_by_id(&self, id: PaymentId, user_id: &UserId)
    -> RepositoryResult<Option<Payment>>;
    /// Payments newest first with their customer embedded.
    fn list_payments(&self, user_id: &UserId) -> RepositoryResult<Vec<PaymentWithCustomer>>;
}

pub trait PaymentWriter {
    fn create_payment(&self, new_payment: &NewPayment) -> RepositoryResult<Payment>;
    fn update_payment_status(
        &self,
        id: PaymentId,
        user_id: &UserId,
        update: &UpdatePaymentStatus,
    ) -> RepositoryResult<Payment>;
}

pub trait FollowupReader {
    fn get_followup_by_id(
        &self,
        id: FollowupId,
        user_id: &UserId,
    ) -> RepositoryResult<Option<FollowupWithRelations>>;
    /// Follow-ups ordered by scheduled date, earliest first.
    fn list_followups(&self, user_id: &UserId) -> RepositoryResult<Vec<FollowupWithRelations>>;
}

pub trait FollowupWriter {
    fn create_followup(&self, new_followup: &NewFollowup) -> RepositoryResult<Followup>;
    fn update_followup_status(
        &self,
        id: FollowupId,
        user_id: &UserId,
        update: &UpdateFollowupStatus,
    ) -> RepositoryResult<Followup>;
}

pub trait ProfileReader {
    fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>>;
}

pub trait ProfileWriter {
    fn upsert_profile(&self, profile: &UpsertProfile) -> RepositoryResult<Profile>;
}

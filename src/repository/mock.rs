//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::followup::{Followup, FollowupWithRelations, NewFollowup, UpdateFollowupStatus};
use crate::domain::payment::{NewPayment, Payment, PaymentWithCustomer, UpdatePaymentStatus};
use crate::domain::profile::{Profile, UpsertProfile};
use crate::domain::types::{CustomerId, FollowupId, PaymentId, UserId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CustomerListQuery, CustomerReader, CustomerWriter, FollowupReader, FollowupWriter,
    PaymentReader, PaymentWriter, ProfileReader, ProfileWriter,
};

mock! {
    pub Repository {}

    impl CustomerReader for Repository {
        fn get_customer_by_id(
            &self,
            id: CustomerId,
            user_id: &UserId,
        ) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<Customer>>;
    }

    impl CustomerWriter for Repository {
        fn create_customers(&self, new_customers: &[NewCustomer]) -> RepositoryResult<Vec<Customer>>;
    }

    impl PaymentReader for Repository {
        fn get_payment_by_id(
            &self,
            id: PaymentId,
            user_id: &UserId,
        ) -> RepositoryResult<Option<Payment>>;
        fn list_payments(&self, user_id: &UserId) -> RepositoryResult<Vec<PaymentWithCustomer>>;
    }

    impl PaymentWriter for Repository {
        fn create_payment(&self, new_payment: &NewPayment) -> RepositoryResult<Payment>;
        fn update_payment_status(
            &self,
            id: PaymentId,
            user_id: &UserId,
            update: &UpdatePaymentStatus,
        ) -> RepositoryResult<Payment>;
    }

    impl FollowupReader for Repository {
        fn get_followup_by_id(
            &self,
            id: FollowupId,
            user_id: &UserId,
        ) -> RepositoryResult<Option<FollowupWithRelations>>;
        fn list_followups(&self, user_id: &UserId) -> RepositoryResult<Vec<FollowupWithRelations>>;
    }

    impl FollowupWriter for Repository {
        fn create_followup(&self, new_followup: &NewFollowup) -> RepositoryResult<Followup>;
        fn update_followup_status(
            &self,
            id: FollowupId,
            user_id: &UserId,
            update: &UpdateFollowupStatus,
        ) -> RepositoryResult<Followup>;
    }

    impl ProfileReader for Repository {
        fn get_profile(&self, user_id: &UserId) -> RepositoryResult<Option<Profile>>;
    }

    impl ProfileWriter for Repository {
        fn upsert_profile(&self, profile: &UpsertProfile) -> RepositoryResult<Profile>;
    }
}

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::UserId;

pub mod customers;
pub mod dashboard;
pub mod errors;
pub mod followups;
pub mod intake;
pub mod messages;
pub mod messaging;
pub mod payments;
pub mod profile;

pub use errors::{ServiceError, ServiceResult};

/// Resolves the row owner for the authenticated caller.
pub(crate) fn current_user_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    user.user_id().map_err(|err| {
        log::error!("Token subject is not a valid user id: {err}");
        ServiceError::Unauthorized
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDateTime, Utc};

    use crate::domain::auth::AuthenticatedUser;
    use crate::domain::customer::Customer;
    use crate::domain::types::{CustomerId, CustomerName, CustomerSource, UserId};

    pub fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: Some("owner@example.com".to_string()),
            exp: 0,
        }
    }

    pub fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    pub fn customer(id: i32, name: &str) -> Customer {
        Customer {
            id: CustomerId::new(id).unwrap(),
            user_id: UserId::new("user-1").unwrap(),
            name: CustomerName::new(name).unwrap(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: None,
            address: None,
            notes: None,
            source: CustomerSource::Manual,
            created_at: now(),
            updated_at: now(),
        }
    }
}

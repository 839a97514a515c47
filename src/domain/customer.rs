use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CustomerEmail, CustomerId, CustomerName, CustomerNotes, CustomerSource, UserId, non_blank,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: UserId,
    pub name: CustomerName,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub source: CustomerSource,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Compact customer view embedded in payments and follow-ups.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CustomerSummary {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.to_string(),
            email: customer.email.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCustomer {
    pub user_id: UserId,
    pub name: CustomerName,
    pub email: Option<CustomerEmail>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<CustomerNotes>,
    pub source: CustomerSource,
}

impl NewCustomer {
    #[must_use]
    pub fn new(user_id: UserId, name: CustomerName, source: CustomerSource) -> Self {
        Self {
            user_id,
            name,
            email: None,
            phone: None,
            address: None,
            notes: None,
            source,
        }
    }

    /// Attaches an email, silently dropping values that fail validation.
    ///
    /// Use [`CustomerEmail::new`] up front when invalid input must be rejected.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = non_blank(email).and_then(|email| match CustomerEmail::new(email) {
            Ok(email) => Some(email),
            Err(err) => {
                log::warn!("Dropping customer email: {err}");
                None
            }
        });
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = non_blank(phone);
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: Option<String>) -> Self {
        self.address = non_blank(address);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.and_then(|notes| CustomerNotes::new(notes).ok());
        self
    }
}

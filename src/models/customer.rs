use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{Customer as DomainCustomer, NewCustomer as DomainNewCustomer};
use crate::domain::types::{CustomerId, CustomerName, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::customer::Customer`].
pub struct Customer {
    pub id: i32,
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub source: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
/// Insertable form of [`Customer`].
pub struct NewCustomer<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub source: &'a str,
}

impl TryFrom<Customer> for DomainCustomer {
    type Error = TypeConstraintError;

    fn try_from(customer: Customer) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CustomerId::try_from(customer.id)?,
            user_id: UserId::new(customer.user_id)?,
            name: CustomerName::new(customer.name)?,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            notes: customer.notes,
            source: customer.source.parse()?,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(customer: &'a DomainNewCustomer) -> Self {
        Self {
            user_id: customer.user_id.as_str(),
            name: customer.name.as_str(),
            email: customer.email.as_ref().map(|e| e.as_str()),
            phone: customer.phone.as_deref(),
            address: customer.address.as_deref(),
            notes: customer.notes.as_ref().map(|n| n.as_str()),
            source: customer.source.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::CustomerSource;

    #[test]
    fn from_domain_new_creates_new_customer() {
        let domain = DomainNewCustomer::new(
            UserId::new("user-9").unwrap(),
            CustomerName::new("Neema").unwrap(),
            CustomerSource::Csv,
        )
        .with_email(Some("neema@example.com".to_string()))
        .with_phone(Some("0712 000 111".to_string()));

        let new: NewCustomer = (&domain).into();
        assert_eq!(new.user_id, "user-9");
        assert_eq!(new.name, "Neema");
        assert_eq!(new.email, Some("neema@example.com"));
        assert_eq!(new.phone, Some("0712 000 111"));
        assert_eq!(new.address, None);
        assert_eq!(new.source, "csv");
    }

    #[test]
    fn customer_into_domain() {
        let now = Utc::now().naive_utc();
        let db = Customer {
            id: 3,
            user_id: "user-9".to_string(),
            name: "Neema".to_string(),
            email: None,
            phone: Some("255712000111".to_string()),
            address: None,
            notes: Some("VIP".to_string()),
            source: "voice".to_string(),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainCustomer::try_from(db).unwrap();
        assert_eq!(domain.id.get(), 3);
        assert_eq!(domain.source, CustomerSource::Voice);
        assert_eq!(domain.notes.as_deref(), Some("VIP"));
    }

    #[test]
    fn unknown_source_is_rejected() {
        let now = Utc::now().naive_utc();
        let db = Customer {
            id: 1,
            user_id: "u".to_string(),
            name: "n".to_string(),
            email: None,
            phone: None,
            address: None,
            notes: None,
            source: "fax".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert!(DomainCustomer::try_from(db).is_err());
    }
}

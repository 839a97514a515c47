//! Domain entities and value objects of the follow-up service.

pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod followup;
pub mod payment;
pub mod profile;
pub mod types;

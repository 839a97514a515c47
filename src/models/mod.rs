//! Database models shared across the follow-up repository.

pub mod config;
pub mod customer;
pub mod followup;
pub mod payment;
pub mod profile;

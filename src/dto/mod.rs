//! Response bodies that are not plain domain values.

pub mod customers;
pub mod messaging;
pub mod profile;

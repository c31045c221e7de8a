//! Domain types exposed by the company list service.

pub mod company;
pub mod query;
pub mod types;

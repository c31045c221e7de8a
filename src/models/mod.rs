//! Diesel models and configuration structures.

pub mod company;
#[cfg(feature = "server")]
pub mod config;
pub mod deal;

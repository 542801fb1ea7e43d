//! Database models backing the support desk repository.

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
pub mod customer;
pub mod notification;
pub mod template;
pub mod ticket;

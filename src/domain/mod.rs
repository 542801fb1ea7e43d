//! Domain aggregates exposed by the support desk service layer.

pub mod auth;
pub mod customer;
pub mod notification;
pub mod template;
pub mod ticket;
pub mod types;

//! Business logic on top of the repositories.

pub mod auth;
pub mod cart;
pub mod orders;

//! Domain models for the storefront.

pub mod account;
pub mod cart;
pub mod product;
pub mod session;

pub use account::Account;
pub use cart::CartLine;
pub use product::{NewProduct, Product, ProductUpdate};
pub use session::{CurrentUser, session_keys};

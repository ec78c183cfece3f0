//! Business logic: channel authorization.

pub mod auth;

pub use auth::AuthService;

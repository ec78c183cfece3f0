//! Data models for channels, presence members, and channel authorization.

pub mod auth;
pub mod channel;
mod finite;
pub mod presence;

pub use auth::*;
pub use channel::*;
pub use presence::*;

//! Persisted login session.

mod models;
pub mod store;

pub use models::Session;
pub use store::{SessionError, SessionStore};

#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Pokédex terminal client.
//!
//! This crate hosts the catalog models, configuration handling,
//! the persisted login session, the HTTP catalog client, the pure
//! list transforms and the screen controllers driven by the terminal UI
//! and any future frontends.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod display;
pub mod models;
pub mod session;
pub mod transform;

pub use catalog::{AuthError, CatalogApi, CatalogClient, CatalogError};
pub use config::AppConfig;
pub use controller::{AuthController, DetailController, NavigateTo, PageController};
pub use models::{CatalogItemDetail, CatalogItemSummary, Page};
pub use session::{Session, SessionError, SessionStore};
pub use transform::SortOrder;

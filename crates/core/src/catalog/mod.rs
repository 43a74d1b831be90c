//! Access to the remote catalog API.
//!
//! [`CatalogApi`] is the seam the controllers are written against;
//! [`CatalogClient`] is the HTTP implementation.

mod cache;
pub mod client;
mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{CatalogItemDetail, Page};

pub use client::CatalogClient;
pub use error::{AuthError, CatalogError, DEFAULT_LOGIN_ERROR};

/// Token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token scheme, normally `bearer`.
    #[serde(default)]
    pub token_type: String,
}

/// Operations offered by the catalog API.
///
/// Implementations attach the current session token to catalog reads and,
/// on an authorization failure, clear the session before returning
/// [`CatalogError::AuthorizationExpired`].
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Exchange credentials for a token. Does not touch the session.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError>;

    /// Fetch `limit` entries starting at `offset`.
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Page, CatalogError>;

    /// Fetch one full record by numeric id or exact name.
    async fn fetch_detail(&self, id_or_name: &str) -> Result<CatalogItemDetail, CatalogError>;
}

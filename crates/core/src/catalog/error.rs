use thiserror::Error;

use crate::{controller::NavigateTo, session::SessionError};

/// Message shown when the login endpoint gives no usable `detail`.
pub const DEFAULT_LOGIN_ERROR: &str = "Login failed. Please try again.";

/// Login failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials were rejected; carries the API's `detail` message.
    #[error("{0}")]
    InvalidCredentials(String),
    /// The API could not be reached or answered with garbage.
    #[error("Login request failed: {0}")]
    Transport(String),
    /// Login succeeded but the session could not be saved.
    #[error(transparent)]
    Storage(#[from] SessionError),
}

/// Failures of authenticated catalog reads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A list request failed.
    #[error("{0}")]
    Fetch(String),
    /// A detail request failed or the identifier did not resolve.
    #[error("{0}")]
    Detail(String),
    /// The API rejected the session token. The session has already been cleared.
    #[error("Session expired, please log in again")]
    AuthorizationExpired,
}

impl CatalogError {
    /// Where the UI should go in response to this error, if anywhere.
    pub fn navigation(&self) -> Option<NavigateTo> {
        match self {
            CatalogError::AuthorizationExpired => Some(NavigateTo::Login),
            _ => None,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record of a successful login.
///
/// Token and display name are written and cleared together; a session with
/// only one of them is treated as logged out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token issued by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Name shown in the UI, the username used at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// When the login happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Fresh session for a token/name pair.
    pub fn new(token: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            display_name: Some(display_name.into()),
            logged_in_at: Some(Utc::now()),
        }
    }

    /// Both halves of the session are present.
    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.display_name.is_some()
    }
}

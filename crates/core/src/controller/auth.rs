//! Login and logout actions.

use tracing::{info, warn};

use crate::{
    catalog::{AuthError, CatalogApi},
    session::SessionStore,
};

use super::NavigateTo;

/// Drives the login screen and the logout action.
#[derive(Debug, Clone)]
pub struct AuthController<C> {
    client: C,
    session: SessionStore,
}

impl<C: CatalogApi> AuthController<C> {
    /// Build a controller around a client and the shared session.
    pub fn new(client: C, session: SessionStore) -> Self {
        Self { client, session }
    }

    /// Where to go on startup: the list when logged in, otherwise login.
    pub fn check(&self) -> NavigateTo {
        if self.session.is_authenticated() {
            NavigateTo::List
        } else {
            NavigateTo::Login
        }
    }

    /// Name of the logged-in user.
    pub fn display_name(&self) -> Option<String> {
        self.session.display_name()
    }

    /// Log in and persist the session; on success go to the list.
    pub async fn login(&self, username: &str, password: &str) -> Result<NavigateTo, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "Username and password are required".to_string(),
            ));
        }
        let response = self.client.login(username, password).await?;
        self.session.set_session(response.access_token, username)?;
        info!(user = username, "logged in");
        Ok(NavigateTo::List)
    }

    /// Forget the session and go back to login.
    pub fn logout(&self) -> NavigateTo {
        if let Err(err) = self.session.clear() {
            warn!("failed to clear session on logout: {err}");
        }
        info!("logged out");
        NavigateTo::Login
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_LOGIN_ERROR;
    use crate::controller::tests::FakeCatalog;

    #[tokio::test]
    async fn login_persists_session_and_navigates_to_list() {
        let session = SessionStore::in_memory();
        let fake = FakeCatalog::new(session.clone());
        let auth = AuthController::new(fake.clone(), session.clone());
        assert_eq!(auth.check(), NavigateTo::Login);

        let next = auth.login(" admin ", "admin").await.expect("login");
        assert_eq!(next, NavigateTo::List);
        assert_eq!(session.token().as_deref(), Some("token-for-admin"));
        assert_eq!(auth.display_name().as_deref(), Some("admin"));
        assert_eq!(auth.check(), NavigateTo::List);
    }

    #[tokio::test]
    async fn rejected_login_leaves_session_empty() {
        let session = SessionStore::in_memory();
        let fake = FakeCatalog::new(session.clone());
        let auth = AuthController::new(fake, session.clone());

        match auth.login("admin", "nope").await {
            Err(AuthError::InvalidCredentials(message)) => {
                assert_eq!(message, DEFAULT_LOGIN_ERROR)
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected_without_a_request() {
        let session = SessionStore::in_memory();
        let fake = FakeCatalog::new(session.clone());
        let auth = AuthController::new(fake.clone(), session);
        assert!(matches!(
            auth.login("  ", "secret").await,
            Err(AuthError::InvalidCredentials(_))
        ));
        assert!(matches!(
            auth.login("admin", "").await,
            Err(AuthError::InvalidCredentials(_))
        ));
        assert_eq!(fake.login_calls(), 0);
    }

    #[test]
    fn logout_clears_session() {
        let session = SessionStore::in_memory();
        session.set_session("t", "admin").expect("session");
        let auth = AuthController::new(FakeCatalog::new(session.clone()), session.clone());
        assert_eq!(auth.logout(), NavigateTo::Login);
        assert!(!session.is_authenticated());
        assert_eq!(auth.check(), NavigateTo::Login);
    }
}

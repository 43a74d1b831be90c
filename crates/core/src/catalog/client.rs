//! `reqwest` implementation of [`CatalogApi`].

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    models::{CatalogItemDetail, ListResponse, Page},
    session::SessionStore,
};

use super::{
    cache::ResponseCache,
    error::{AuthError, CatalogError, DEFAULT_LOGIN_ERROR},
    CatalogApi, LoginResponse,
};

const LOGIN_PATH: &str = "login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Value,
}

impl ErrorBody {
    // FastAPI reports validation failures as a list; only plain strings are shown verbatim.
    fn message(self) -> Option<String> {
        match self.detail {
            Value::String(text) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

/// HTTP client for the catalog API.
///
/// Cheap to clone; clones share the connection pool, session and cache.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
    catalog_path: String,
    session: SessionStore,
    cache: ResponseCache,
}

impl CatalogClient {
    /// Build a client from configuration and the shared session.
    pub fn new(config: &AppConfig, session: SessionStore) -> Result<Self> {
        let base_url = Url::parse(config.api_url.trim())
            .with_context(|| format!("invalid api_url '{}'", config.api_url))?;
        if base_url.cannot_be_a_base() {
            bail!("api_url '{}' cannot carry a path", config.api_url);
        }
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url,
            catalog_path: config.catalog_path.trim_matches('/').to_string(),
            session,
            cache: ResponseCache::new(config.list_stale(), config.detail_stale()),
        })
    }

    /// Session this client reads its token from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Drop all cached responses.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    fn catalog_url(&self, id_or_name: Option<&str>) -> Url {
        let mut segments: Vec<&str> = self.catalog_path.split('/').collect();
        segments.extend(id_or_name);
        self.endpoint(&segments)
    }

    fn authorize(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // Any 401 ends the session; the caller sees `AuthorizationExpired`.
    fn check_authorized(&self, response: Response) -> Result<Response, CatalogError> {
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        warn!(url = %response.url(), "authorization rejected, clearing session");
        if let Err(err) = self.session.clear() {
            warn!("failed to clear session after 401: {err}");
        }
        self.cache.clear();
        Err(CatalogError::AuthorizationExpired)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let url = self.endpoint(&[LOGIN_PATH]);
        debug!(%url, username, "logging in");
        let response = self
            .http
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::message)
                .unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string());
            debug!(%status, "login rejected");
            return Err(AuthError::InvalidCredentials(message));
        }

        response
            .json::<LoginResponse>()
            .await
            .map_err(|err| AuthError::Transport(format!("invalid login response: {err}")))
    }

    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Page, CatalogError> {
        if limit == 0 {
            return Err(CatalogError::Fetch(
                "Failed to fetch Pokemon list: limit must be at least 1".to_string(),
            ));
        }
        let token = self.session.token();
        if let Some(page) = self.cache.page(token.as_deref(), offset, limit) {
            debug!(offset, limit, "page served from cache");
            return Ok(page);
        }

        let url = self.catalog_url(None);
        debug!(%url, offset, limit, "fetching page");
        let request = self
            .http
            .get(url)
            .query(&[("offset", offset), ("limit", limit)]);
        let response = self
            .authorize(request, token.as_deref())
            .send()
            .await
            .map_err(|err| CatalogError::Fetch(format!("Failed to fetch Pokemon list: {err}")))?;
        let response = self.check_authorized(response)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Fetch(format!(
                "Failed to fetch Pokemon list (HTTP {status})"
            )));
        }

        let body: ListResponse = response
            .json()
            .await
            .map_err(|err| CatalogError::Fetch(format!("Failed to fetch Pokemon list: {err}")))?;
        let page = Page::from_response(body, offset, limit);
        debug!(items = page.items.len(), total = page.total_count, "page fetched");
        self.cache.store_page(token.as_deref(), &page);
        Ok(page)
    }

    /// A blank identifier is rejected locally as not found without a request;
    /// every other not-found comes from the API.
    async fn fetch_detail(&self, id_or_name: &str) -> Result<CatalogItemDetail, CatalogError> {
        let key = id_or_name.trim();
        if key.is_empty() {
            return Err(CatalogError::Detail("Pokemon not found".to_string()));
        }
        let token = self.session.token();
        if let Some(detail) = self.cache.detail(token.as_deref(), key) {
            debug!(id_or_name = key, "detail served from cache");
            return Ok(detail);
        }

        let url = self.catalog_url(Some(key));
        debug!(%url, "fetching detail");
        let response = self
            .authorize(self.http.get(url), token.as_deref())
            .send()
            .await
            .map_err(|err| CatalogError::Detail(format!("Failed to fetch Pokemon: {key}: {err}")))?;
        let response = self.check_authorized(response)?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(CatalogError::Detail(format!(
                "Failed to fetch Pokemon: {key} ({reason})"
            )));
        }

        let detail: CatalogItemDetail = response
            .json()
            .await
            .map_err(|err| CatalogError::Detail(format!("Failed to fetch Pokemon: {key}: {err}")))?;
        self.cache.store_detail(token.as_deref(), key, &detail);
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, Method::POST, MockServer};
    use serde_json::json;

    fn client_for(server: &MockServer, session: SessionStore) -> CatalogClient {
        let config = AppConfig {
            api_url: server.base_url(),
            ..AppConfig::default()
        };
        CatalogClient::new(&config, session).expect("client")
    }

    fn logged_in() -> SessionStore {
        let session = SessionStore::in_memory();
        session.set_session("secret-token", "ash").expect("session");
        session
    }

    fn list_body() -> Value {
        json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "charmander", "url": "https://pokeapi.co/api/v2/pokemon/4/"}
            ]
        })
    }

    #[tokio::test]
    async fn page_request_carries_bearer_token_and_window() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/pokemons")
                    .query_param("offset", "20")
                    .query_param("limit", "10")
                    .header("authorization", "Bearer secret-token");
                then.status(200).json_body(list_body());
            })
            .await;

        let client = client_for(&server, logged_in());
        let page = client.fetch_page(20, 10).await.expect("page");
        mock.assert_async().await;
        assert_eq!(page.total_count, 2);
        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 10);
        assert_eq!(page.items[1].id(), Some(4));
    }

    #[tokio::test]
    async fn token_is_omitted_without_session() {
        let server = MockServer::start_async().await;
        let with_auth = server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemons").header_exists("authorization");
                then.status(500);
            })
            .await;
        let without_auth = server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemons");
                then.status(200).json_body(list_body());
            })
            .await;

        let client = client_for(&server, SessionStore::in_memory());
        client.fetch_page(0, 20).await.expect("page");
        with_auth.assert_hits_async(0).await;
        without_auth.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn unauthorized_clears_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemons");
                then.status(401)
                    .json_body(json!({"detail": "Could not validate credentials"}));
            })
            .await;

        let session = logged_in();
        let client = client_for(&server, session.clone());
        let err = client.fetch_page(0, 20).await.expect_err("401");
        assert_eq!(err, CatalogError::AuthorizationExpired);
        assert_eq!(err.navigation(), Some(crate::controller::NavigateTo::Login));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn server_errors_become_fetch_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemons");
                then.status(503);
            })
            .await;

        let session = logged_in();
        let client = client_for(&server, session.clone());
        match client.fetch_page(0, 20).await {
            Err(CatalogError::Fetch(message)) => assert!(message.contains("503"), "{message}"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn zero_limit_is_rejected_locally() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemons");
                then.status(200).json_body(list_body());
            })
            .await;
        let client = client_for(&server, logged_in());
        assert!(matches!(
            client.fetch_page(0, 0).await,
            Err(CatalogError::Fetch(_))
        ));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn repeated_page_within_window_hits_server_once() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemons");
                then.status(200).json_body(list_body());
            })
            .await;
        let client = client_for(&server, logged_in());
        let first = client.fetch_page(0, 20).await.expect("first");
        let second = client.fetch_page(0, 20).await.expect("second");
        assert_eq!(first, second);
        mock.assert_hits_async(1).await;

        client.invalidate();
        client.fetch_page(0, 20).await.expect("third");
        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn detail_resolves_by_name() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/pokemons/pikachu")
                    .header("authorization", "Bearer secret-token");
                then.status(200).json_body(json!({
                    "id": 25,
                    "name": "pikachu",
                    "height": 4,
                    "weight": 60,
                    "base_experience": 112,
                    "types": [{"slot": 1, "type": {"name": "electric", "url": ""}}],
                    "stats": [],
                    "abilities": [],
                    "moves": [],
                    "forms": [],
                    "sprites": {}
                }));
            })
            .await;
        let client = client_for(&server, logged_in());
        let detail = client.fetch_detail("pikachu").await.expect("detail");
        mock.assert_async().await;
        assert_eq!(detail.id, 25);
        assert_eq!(detail.types[0].type_name, "electric");
    }

    #[tokio::test]
    async fn unknown_detail_propagates_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemons/missingno");
                then.status(404).json_body(json!({"detail": "Pokemon not found"}));
            })
            .await;
        let client = client_for(&server, logged_in());
        match client.fetch_detail("missingno").await {
            Err(CatalogError::Detail(message)) => {
                assert!(message.contains("missingno"), "{message}");
                assert!(message.contains("Pokemon not found"), "{message}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn detail_unauthorized_expires_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pokemons/1");
                then.status(401);
            })
            .await;
        let session = logged_in();
        let client = client_for(&server, session.clone());
        let err = client.fetch_detail("1").await.expect_err("401");
        assert_eq!(err, CatalogError::AuthorizationExpired);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn login_returns_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/login")
                    .json_body(json!({"username": "admin", "password": "admin"}));
                then.status(200)
                    .json_body(json!({"access_token": "jwt", "token_type": "bearer"}));
            })
            .await;
        let session = SessionStore::in_memory();
        let client = client_for(&server, session.clone());
        let response = client.login("admin", "admin").await.expect("login");
        mock.assert_async().await;
        assert_eq!(response.access_token, "jwt");
        assert_eq!(response.token_type, "bearer");
        // Persisting the session is the caller's job.
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn login_failure_surfaces_detail_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/login");
                then.status(401)
                    .json_body(json!({"detail": "Incorrect username or password"}));
            })
            .await;
        let client = client_for(&server, SessionStore::in_memory());
        match client.login("admin", "wrong").await {
            Err(AuthError::InvalidCredentials(message)) => {
                assert_eq!(message, "Incorrect username or password")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_failure_without_detail_uses_default_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/login");
                then.status(422)
                    .json_body(json!({"detail": [{"msg": "field required"}]}));
            })
            .await;
        let client = client_for(&server, SessionStore::in_memory());
        match client.login("", "").await {
            Err(AuthError::InvalidCredentials(message)) => {
                assert_eq!(message, DEFAULT_LOGIN_ERROR)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_detail_id_never_reaches_server() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200);
            })
            .await;

        let client = client_for(&server, logged_in());
        let err = client.fetch_detail("   ").await.expect_err("blank id");
        assert_eq!(err, CatalogError::Detail("Pokemon not found".to_string()));
        mock.assert_hits_async(0).await;
    }

    #[test]
    fn endpoints_respect_base_path() {
        let config = AppConfig {
            api_url: "http://dex.example.com/api/v1/".to_string(),
            catalog_path: "/items/".to_string(),
            ..AppConfig::default()
        };
        let client = CatalogClient::new(&config, SessionStore::in_memory()).expect("client");
        assert_eq!(
            client.catalog_url(None).as_str(),
            "http://dex.example.com/api/v1/items"
        );
        assert_eq!(
            client.catalog_url(Some("mr. mime")).as_str(),
            "http://dex.example.com/api/v1/items/mr.%20mime"
        );
        assert_eq!(
            client.endpoint(&[LOGIN_PATH]).as_str(),
            "http://dex.example.com/api/v1/login"
        );
    }
}

//! Detail screen state machine.

use tracing::debug;

use crate::{
    catalog::{CatalogApi, CatalogError},
    display::DetailView,
    models::CatalogItemDetail,
    session::SessionStore,
};

use super::{Command, NavigateTo, Ticket, TicketCounter};

/// Where the detail screen is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// No session; the user is being sent to login.
    Unauthenticated,
    /// The record request is outstanding.
    Loading,
    /// The record is loaded.
    Ready(Box<CatalogItemDetail>),
    /// The request failed with this message.
    Error(String),
}

/// A detail request the caller should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct DetailRequest {
    pub ticket: Ticket,
    pub id_or_name: String,
}

/// Owns the state of one detail screen.
#[derive(Debug)]
pub struct DetailController<C> {
    client: C,
    session: SessionStore,
    id_or_name: String,
    state: DetailState,
    tickets: TicketCounter,
}

impl<C: CatalogApi> DetailController<C> {
    /// Controller for the entry identified by `id_or_name`.
    pub fn new(client: C, session: SessionStore, id_or_name: impl Into<String>) -> Self {
        Self {
            client,
            session,
            id_or_name: id_or_name.into().trim().to_string(),
            state: DetailState::Unauthenticated,
            tickets: TicketCounter::default(),
        }
    }

    /// Client used for fetches.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Identifier this screen shows.
    pub fn id_or_name(&self) -> &str {
        &self.id_or_name
    }

    /// Current state.
    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Enter the screen: check the session, then request the record.
    pub fn enter(&mut self) -> Option<Command<DetailRequest>> {
        if self.session.token().is_none() {
            self.tickets.invalidate();
            self.state = DetailState::Unauthenticated;
            return Some(Command::Navigate(NavigateTo::Login));
        }
        if self.id_or_name.is_empty() {
            self.state = DetailState::Error("Pokemon not found".to_string());
            return None;
        }
        self.state = DetailState::Loading;
        Some(Command::Fetch(DetailRequest {
            ticket: self.tickets.issue(),
            id_or_name: self.id_or_name.clone(),
        }))
    }

    /// Apply the result of `request`. Superseded results are ignored unless the
    /// session was rejected.
    pub fn complete(
        &mut self,
        request: &DetailRequest,
        result: Result<CatalogItemDetail, CatalogError>,
    ) -> Option<NavigateTo> {
        let current = self.tickets.is_current(request.ticket);
        if let Some(target) = result.as_ref().err().and_then(CatalogError::navigation) {
            if !current && self.state == DetailState::Unauthenticated {
                return None;
            }
            self.tickets.invalidate();
            self.state = DetailState::Unauthenticated;
            return Some(target);
        }
        if !current {
            debug!(id_or_name = %request.id_or_name, "dropping superseded detail response");
            return None;
        }
        self.tickets.invalidate();
        self.state = match result {
            Ok(detail) => DetailState::Ready(Box::new(detail)),
            Err(err) => DetailState::Error(err.to_string()),
        };
        None
    }

    /// Enter the screen and wait for the record.
    pub async fn load(&mut self) -> Option<NavigateTo> {
        match self.enter()? {
            Command::Navigate(target) => Some(target),
            Command::Fetch(request) => {
                let result = self.client.fetch_detail(&request.id_or_name).await;
                self.complete(&request, result)
            }
        }
    }

    /// Display values for the loaded record, recomputed on every call.
    pub fn view(&self) -> Option<DetailView> {
        match &self.state {
            DetailState::Ready(detail) => Some(DetailView::from_detail(detail)),
            _ => None,
        }
    }
}

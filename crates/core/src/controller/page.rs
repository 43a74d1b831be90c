//! List screen state machine.

use tracing::debug;

use crate::{
    catalog::{CatalogApi, CatalogError},
    models::{CatalogItemSummary, Page},
    session::SessionStore,
    transform::{self, SortOrder},
};

use super::{Command, NavigateTo, Ticket, TicketCounter};

/// Where the list screen is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// No session; the user is being sent to login.
    Unauthenticated,
    /// A page request is outstanding.
    Loading,
    /// A page is loaded.
    Ready(Page),
    /// The last request failed with this message.
    Error(String),
}

/// A page request the caller should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct PageRequest {
    pub ticket: Ticket,
    pub offset: u32,
    pub limit: u32,
}

/// Snapshot of what the list screen shows.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct PageView<'a> {
    pub state: &'a PageState,
    /// Filtered and sorted entries of the loaded page.
    pub items: Vec<&'a CatalogItemSummary>,
    pub query: &'a str,
    pub order: SortOrder,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u32,
    pub has_next: bool,
    pub has_previous: bool,
    /// Pagination controls are hidden while searching.
    pub show_pagination: bool,
}

/// Owns list-screen state: pagination window, search query, sort order and
/// the loaded page.
#[derive(Debug)]
pub struct PageController<C> {
    client: C,
    session: SessionStore,
    state: PageState,
    offset: u32,
    limit: u32,
    query: String,
    order: SortOrder,
    tickets: TicketCounter,
}

impl<C: CatalogApi> PageController<C> {
    /// Create a controller requesting `limit` entries per page.
    pub fn new(client: C, session: SessionStore, limit: u32) -> Self {
        Self {
            client,
            session,
            state: PageState::Unauthenticated,
            offset: 0,
            limit: limit.max(1),
            query: String::new(),
            order: SortOrder::default(),
            tickets: TicketCounter::default(),
        }
    }

    /// Client used for fetches.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Current state.
    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Offset of the current window.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Entries per page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Current search query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current sort order.
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Enter the screen: check the session, then load the current window.
    pub fn enter(&mut self) -> Command<PageRequest> {
        self.begin(self.offset)
    }

    /// Move to `offset` and load it.
    pub fn set_offset(&mut self, offset: u32) -> Command<PageRequest> {
        self.begin(offset)
    }

    /// Load the following window, if the loaded page says there is one.
    pub fn next_page(&mut self) -> Option<Command<PageRequest>> {
        match &self.state {
            PageState::Ready(page) if page.has_next() => {
                let offset = page.offset.saturating_add(page.limit);
                Some(self.begin(offset))
            }
            _ => None,
        }
    }

    /// Load the preceding window, if any.
    pub fn previous_page(&mut self) -> Option<Command<PageRequest>> {
        if self.offset == 0 {
            return None;
        }
        let offset = self.offset.saturating_sub(self.limit);
        Some(self.begin(offset))
    }

    /// Change the search query. Never fetches.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Change the sort order. Never fetches.
    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    fn begin(&mut self, offset: u32) -> Command<PageRequest> {
        if self.session.token().is_none() {
            self.tickets.invalidate();
            self.state = PageState::Unauthenticated;
            return Command::Navigate(NavigateTo::Login);
        }
        self.offset = offset;
        self.state = PageState::Loading;
        Command::Fetch(PageRequest {
            ticket: self.tickets.issue(),
            offset,
            limit: self.limit,
        })
    }

    /// Apply the result of `request`. Superseded results are ignored unless the
    /// session was rejected.
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: Result<Page, CatalogError>,
    ) -> Option<NavigateTo> {
        let current = self.tickets.is_current(request.ticket);
        // The session is already gone, so even a superseded reply must
        // leave the screen, but only once.
        if let Some(target) = result.as_ref().err().and_then(CatalogError::navigation) {
            if !current && self.state == PageState::Unauthenticated {
                return None;
            }
            self.tickets.invalidate();
            self.state = PageState::Unauthenticated;
            return Some(target);
        }
        if !current {
            debug!(offset = request.offset, "dropping superseded page response");
            return None;
        }
        self.tickets.invalidate();
        match result {
            Ok(page) => {
                debug!(offset = page.offset, items = page.items.len(), "page ready");
                self.state = PageState::Ready(page);
            }
            Err(err) => self.state = PageState::Error(err.to_string()),
        }
        None
    }

    /// Perform `command` inline with the controller's client.
    pub async fn run(&mut self, command: Command<PageRequest>) -> Option<NavigateTo> {
        match command {
            Command::Navigate(target) => Some(target),
            Command::Fetch(request) => {
                let result = self.client.fetch_page(request.offset, request.limit).await;
                self.complete(request, result)
            }
        }
    }

    /// Enter the screen and wait for the page.
    pub async fn load(&mut self) -> Option<NavigateTo> {
        let command = self.enter();
        self.run(command).await
    }

    /// Derive the displayed list from the loaded page.
    pub fn view(&self) -> PageView<'_> {
        let (items, pagination) = match &self.state {
            PageState::Ready(page) => (
                transform::derive(&page.items.iter().collect::<Vec<_>>(), &self.query, self.order),
                Some(page),
            ),
            _ => (Vec::new(), None),
        };
        PageView {
            state: &self.state,
            items,
            query: &self.query,
            order: self.order,
            current_page: self.offset / self.limit + 1,
            total_pages: pagination.map(Page::total_pages).unwrap_or(0),
            total_count: pagination.map(|page| page.total_count).unwrap_or(0),
            has_next: pagination.map(Page::has_next).unwrap_or(false),
            has_previous: self.offset > 0,
            show_pagination: self.query.trim().is_empty(),
        }
    }
}

//! Screen controllers.
//!
//! Controllers own no UI. Each exposes explicit transitions: the caller asks
//! for a [`Command`], performs the fetch it describes (inline or on a task),
//! and hands the result back together with the request it answers. Replies to
//! superseded requests are dropped, so the most recent request always wins.

pub mod auth;
pub mod detail;
pub mod page;

pub use auth::AuthController;
pub use detail::{DetailController, DetailRequest, DetailState};
pub use page::{PageController, PageRequest, PageState, PageView};

/// Navigation requested by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateTo {
    /// The login screen.
    Login,
    /// The catalog list.
    List,
    /// The detail screen for an id or name.
    Detail(String),
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Source of increasing tickets; only the latest one is current.
#[derive(Debug, Default)]
pub(crate) struct TicketCounter {
    current: u64,
}

impl TicketCounter {
    pub(crate) fn issue(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }

    // Makes every outstanding ticket stale.
    pub(crate) fn invalidate(&mut self) {
        self.current += 1;
    }
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<R> {
    /// Leave the screen.
    Navigate(NavigateTo),
    /// Perform the described request and report back.
    Fetch(R),
}

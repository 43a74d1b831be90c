//! Filtering and ordering of a fetched page.
//!
//! Both operations are pure: they never touch their input and always return
//! a new vector. They are generic over anything that borrows as a
//! [`CatalogItemSummary`], so callers can work on owned items or on
//! references into an already loaded page.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CatalogItemSummary;

/// Ordering applied to the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Lowest number first.
    #[default]
    NumberAsc,
    /// Highest number first.
    NumberDesc,
    /// A to Z.
    NameAsc,
    /// Z to A.
    NameDesc,
}

/// Returned when parsing an unknown sort token.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort order '{0}'")]
pub struct UnknownSortOrder(pub String);

impl SortOrder {
    /// Every order, in the cycle used by [`SortOrder::next`].
    pub const ALL: [SortOrder; 4] = [
        SortOrder::NumberAsc,
        SortOrder::NumberDesc,
        SortOrder::NameAsc,
        SortOrder::NameDesc,
    ];

    /// Stable token, e.g. `number-asc`.
    pub fn token(self) -> &'static str {
        match self {
            SortOrder::NumberAsc => "number-asc",
            SortOrder::NumberDesc => "number-desc",
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
        }
    }

    /// Short label for menus.
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::NumberAsc => "Number (ascending)",
            SortOrder::NumberDesc => "Number (descending)",
            SortOrder::NameAsc => "Name (A-Z)",
            SortOrder::NameDesc => "Name (Z-A)",
        }
    }

    /// Parse a token, returning `None` for anything unrecognised.
    pub fn parse_lenient(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    /// The order after this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|order| *order == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.token().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSortOrder(s.to_string()))
    }
}

/// Keep the items whose name or number contains `query`, case-insensitively.
///
/// A blank query returns the input unchanged.
pub fn filter<T>(items: &[T], query: &str) -> Vec<T>
where
    T: AsRef<CatalogItemSummary> + Clone,
{
    if query.trim().is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| matches(item.as_ref(), &needle))
        .cloned()
        .collect()
}

fn matches(item: &CatalogItemSummary, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item
            .id()
            .map(|id| id.to_string().contains(needle))
            .unwrap_or(false)
}

/// Return the items in `order`. Sorting is stable.
pub fn sort<T>(items: &[T], order: SortOrder) -> Vec<T>
where
    T: AsRef<CatalogItemSummary> + Clone,
{
    let mut sorted = items.to_vec();
    match order {
        SortOrder::NumberAsc => {
            sorted.sort_by(|a, b| compare_numbers(a.as_ref(), b.as_ref()));
        }
        SortOrder::NumberDesc => {
            sorted.sort_by(|a, b| compare_numbers(b.as_ref(), a.as_ref()));
        }
        SortOrder::NameAsc => {
            sorted.sort_by(|a, b| compare_names(a.as_ref(), b.as_ref()));
        }
        SortOrder::NameDesc => {
            sorted.sort_by(|a, b| compare_names(a.as_ref(), b.as_ref()));
            sorted.reverse();
        }
    }
    sorted
}

/// Sort by a raw order token; unknown tokens leave the input as is.
pub fn sort_by_token<T>(items: &[T], token: &str) -> Vec<T>
where
    T: AsRef<CatalogItemSummary> + Clone,
{
    match SortOrder::parse_lenient(token) {
        Some(order) => sort(items, order),
        None => items.to_vec(),
    }
}

/// Filter first, then sort: the list shown for a loaded page.
pub fn derive<T>(items: &[T], query: &str, order: SortOrder) -> Vec<T>
where
    T: AsRef<CatalogItemSummary> + Clone,
{
    sort(&filter(items, query), order)
}

// Entries without a number sort after numbered ones.
fn compare_numbers(a: &CatalogItemSummary, b: &CatalogItemSummary) -> Ordering {
    match (a.id(), b.id()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Case-folded first so "Zubat" and "abra" interleave the way a reader expects.
fn compare_names(a: &CatalogItemSummary, b: &CatalogItemSummary) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.reference_url.cmp(&b.reference_url))
}

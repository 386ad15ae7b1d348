//! List filtering parameters.
//!
//! [`ListParams`] is the raw query-string shape accepted by the list
//! endpoint; [`OrderFilter`] is the normalized form the store consumes.
//! Normalization drops the `"All"` owner sentinel and empty strings, so
//! backends only ever see filters that actually restrict the result.

use serde::Deserialize;

use crate::core::order::Order;

/// Owner value meaning "no owner filter".
pub const OWNER_ALL: &str = "All";

/// Raw query-string parameters accepted by the list endpoint.
///
/// ```text
/// GET /orders?owner=alice&search=SN-
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// Exact owner match; `"All"` disables the filter.
    pub owner: Option<String>,

    /// Case-insensitive substring match against the serial number.
    pub search: Option<String>,
}

/// Normalized filter passed to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    /// Exact owner match.
    pub owner: Option<String>,

    /// Case-insensitive substring match against the serial number.
    pub search: Option<String>,
}

impl OrderFilter {
    /// A filter that matches every order.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to orders with exactly this owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Restrict to serial numbers containing this substring,
    /// case-insensitive.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Whether an order satisfies this filter.
    ///
    /// Shared by in-process backends; the MongoDB backend expresses the
    /// same conditions as a server-side query instead.
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(owner) = &self.owner
            && &order.owner != owner
        {
            return false;
        }
        if let Some(search) = &self.search
            && !order
                .serial_number
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return false;
        }
        true
    }
}

impl From<ListParams> for OrderFilter {
    fn from(params: ListParams) -> Self {
        Self {
            owner: params
                .owner
                .filter(|owner| !owner.is_empty() && owner != OWNER_ALL),
            search: params.search.filter(|search| !search.is_empty()),
        }
    }
}

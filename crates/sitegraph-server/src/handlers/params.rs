//! Request parameter parsing for listings.
//!
//! Listing parameters are lenient: a malformed `start` or `items` falls back
//! to its default and a malformed sort entry is dropped, each with a warning.

use sitegraph_domain::model::Sort;
use tracing::warn;

use crate::config::MembershipSettings;

pub const PARAM_START: &str = "start";
pub const PARAM_ITEMS: &str = "items";
pub const PARAM_SORT: &str = "sort";

/// Parsed pagination and ordering for a listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersQuery {
    /// Zero-based offset of the first entry.
    pub start: usize,
    /// Page size.
    pub items: usize,
    /// Sort entries, most significant first.
    pub sorts: Vec<Sort>,
}

impl MembersQuery {
    /// Query with default paging and no ordering.
    pub fn with_defaults(settings: &MembershipSettings) -> Self {
        Self {
            start: 0,
            items: settings.default_items,
            sorts: Vec::new(),
        }
    }

    /// Parses `(name, value)` request parameters. `sort` may repeat; unknown
    /// names are ignored.
    pub fn from_pairs<'a, I>(pairs: I, settings: &MembershipSettings) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::with_defaults(settings);

        for (name, value) in pairs {
            match name {
                PARAM_START => match value.trim().parse::<usize>() {
                    Ok(start) => query.start = start,
                    Err(e) => warn!(value, error = %e, "Invalid start parameter, using 0"),
                },
                PARAM_ITEMS => match value.trim().parse::<usize>() {
                    Ok(0) | Err(_) => warn!(
                        value,
                        default_items = settings.default_items,
                        "Invalid items parameter, using default"
                    ),
                    Ok(items) if items > settings.max_items => {
                        warn!(items, max_items = settings.max_items, "Items parameter clamped");
                        query.items = settings.max_items;
                    }
                    Ok(items) => query.items = items,
                },
                PARAM_SORT => match value.parse::<Sort>() {
                    Ok(sort) => query.sorts.push(sort),
                    Err(e) => warn!(value, error = %e, "Dropping invalid sort entry"),
                },
                _ => {}
            }
        }

        query
    }
}

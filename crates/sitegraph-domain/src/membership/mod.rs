//! Membership resolution for sites.
//!
//! A site declares a list of authorization groups (and occasionally users).
//! The [`MembershipGraphBuilder`] expands that list through nested group
//! membership into two insertion-ordered mappings, one for groups and one
//! for users, each entry recording the group that pulled it in.
//!
//! Listings are produced by ranking the mapping keys with a [`Comparator`]
//! and cutting a [`Page`] out of the result.

mod builder;
mod config;
mod key;
mod page;
mod ranking;
mod record;
mod traits;

#[cfg(test)]
mod builder_proptest;
#[cfg(test)]
mod ranking_proptest;
#[cfg(test)]
pub(crate) mod tests;

pub use builder::MembershipGraphBuilder;
pub use config::{MembershipConfig, DEFAULT_MAX_LIST_SIZE};
pub use key::{AuthorizableKey, GroupKey, UserKey};
pub use page::Page;
pub use ranking::{compare, Comparator};
pub use record::{Membership, MembershipGraph};
pub use traits::{EntityStore, EventSink, ProfileStore, SiteEvent, SiteEventKind};

//! sitegraph-domain: Core site membership logic
//!
//! This crate contains the membership resolution core including:
//! - Authorizable, content node and profile types
//! - Membership graph builder (cycle-safe group expansion)
//! - Ranking engine for sorted member listings
//! - Paginated views over membership sets
//! - Site service facade (membership tests, join/unjoin, lookups)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              sitegraph-domain                │
//! ├─────────────────────────────────────────────┤
//! │  model/      - Authorizables, nodes, sorts  │
//! │  membership/ - Graph builder, keys, pages   │
//! │  site/       - Site service facade          │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod membership;
pub mod model;
pub mod site;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use membership::{
    EntityStore, EventSink, MembershipConfig, MembershipGraph, MembershipGraphBuilder,
    ProfileStore, SiteEvent, SiteEventKind,
};
pub use site::{MemberCount, SiteService};

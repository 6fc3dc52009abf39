//! Site-level façade over membership resolution.
//!
//! [`SiteService`] answers membership questions about a site, produces
//! ranked and paginated member and group listings, performs join/unjoin
//! with their guard conditions, and locates sites by path or name.

mod service;


pub use service::{MemberCount, SiteService};

//! Request handlers.
//!
//! Handlers sit between a transport (the command-line front end today) and
//! the [`SiteService`](sitegraph_domain::SiteService): they turn raw request
//! parameters into typed queries and service results into serialisable rows.

pub mod members;
pub mod params;

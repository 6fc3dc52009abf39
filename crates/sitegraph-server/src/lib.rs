//! sitegraph-server: Configuration, logging and request handling
//!
//! This crate wires the membership core to its outer surfaces:
//! - Configuration management (defaults, YAML file, environment)
//! - Structured logging setup
//! - Event sinks for join/unjoin notifications
//! - Member listing handler with request parameter parsing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              sitegraph-server                │
//! ├─────────────────────────────────────────────┤
//! │  config.rs   - Configuration management     │
//! │  logging.rs  - Subscriber setup             │
//! │  events.rs   - Event sinks                  │
//! │  handlers/   - Request handlers             │
//! │    members/       - Member listings         │
//! │    params.rs      - start/items/sort        │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod events;
pub mod handlers;
pub mod logging;

// Re-exports for convenience
pub use config::{ConfigLoadError, ServerConfig};
pub use events::{ChannelEventSink, TracingEventSink};
pub use handlers::members::{MembersError, MembersHandler, MembersListing};
pub use handlers::params::MembersQuery;
pub use logging::{init_logging, LoggingConfig};

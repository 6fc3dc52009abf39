//! sitegraph-storage: Entity and profile store implementations
//!
//! This crate provides the stores the membership core consumes:
//! - In-memory entity store (authorizables, declared members, content nodes)
//! - In-memory profile store
//! - JSON fixture loading
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             sitegraph-storage                │
//! ├─────────────────────────────────────────────┤
//! │  error.rs   - StorageError, DomainError map │
//! │  fixture.rs - JSON fixture format           │
//! │  memory.rs  - DashMap-backed stores         │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod fixture;
pub mod memory;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use fixture::{Fixture, FixtureGroup};
pub use memory::MemoryEntityStore;

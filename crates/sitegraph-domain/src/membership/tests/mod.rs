//! Tests for the membership module.
//!
//! Organized by functionality:
//! - Graph construction (dedup, cycles, provenance)
//! - Size cap and partial graphs
//! - Failure policy for unresolvable entities and missing profiles

//! Configuration for membership graph building.

/// Default cap on each of the group and user mappings.
pub const DEFAULT_MAX_LIST_SIZE: usize = 10_000;

/// Configuration for the membership graph builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipConfig {
    /// Maximum number of entries in either the group or the user mapping.
    ///
    /// Reaching the cap halts expansion and marks the graph as partial.
    pub max_list_size: usize,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            max_list_size: DEFAULT_MAX_LIST_SIZE,
        }
    }
}

impl MembershipConfig {
    /// Creates a new configuration with the specified list size cap.
    pub fn with_max_list_size(mut self, max_list_size: usize) -> Self {
        self.max_list_size = max_list_size;
        self
    }
}

//! JSON fixture format for seeding an in-memory store.
//!
//! ```json
//! {
//!   "users": [{ "id": "alice" }],
//!   "groups": [{ "id": "g-physics", "joinable": "yes", "sites": ["/sites/physics"], "members": ["alice"] }],
//!   "profiles": [{ "user_id": "alice", "first_name": "Alice", "last_name": "Liddell" }],
//!   "nodes": [{ "path": "/sites/physics", "resource_type": "sakai/site", "authorizables": ["g-physics"] }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sitegraph_domain::model::{AuthorizableId, ContentNode, Group, Profile, User};

use crate::error::{StorageError, StorageResult};

/// A group together with its declared member ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureGroup {
    #[serde(flatten)]
    pub group: Group,
    #[serde(default)]
    pub members: Vec<AuthorizableId>,
}

/// An authorizable of a kind the membership core does not handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureOther {
    pub id: AuthorizableId,
    pub type_name: String,
}

/// Complete store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub groups: Vec<FixtureGroup>,
    #[serde(default)]
    pub others: Vec<FixtureOther>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub nodes: Vec<ContentNode>,
}

impl Fixture {
    pub fn from_json(json: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a fixture file.
    pub fn from_path(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| StorageError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&contents)
    }
}

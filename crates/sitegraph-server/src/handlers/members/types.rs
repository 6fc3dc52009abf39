//! Data types for member listings.

use serde::Serialize;
use sitegraph_domain::DomainError;

/// Group ids with this prefix are site groups and are filtered per site.
pub const SITE_GROUP_PREFIX: &str = "g-";

/// One row of a member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Direct groups of the user; absent when the user belongs to no group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_groups: Option<Vec<String>>,
}

/// A page of member rows plus the size of the full listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembersListing {
    pub site: String,
    pub total: usize,
    /// Set when the site's membership graph was truncated by the size cap.
    pub partial: bool,
    pub members: Vec<MemberEntry>,
}

/// Errors that can occur while listing members.
#[derive(Debug, thiserror::Error)]
pub enum MembersError {
    /// The requested node is not a site.
    #[error("location ({path}) does not represent a site")]
    NotASite { path: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl MembersError {
    /// HTTP status a transport layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            MembersError::NotASite { .. } => 400,
            MembersError::Domain(e) => e.status_code(),
        }
    }
}

/// Result type for member listing operations.
pub type MembersResult<T> = Result<T, MembersError>;

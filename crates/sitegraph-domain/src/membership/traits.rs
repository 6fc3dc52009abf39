//! Traits for the collaborators the membership core consumes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::model::{parent_path, Authorizable, AuthorizableId, ContentNode, Group, Profile, User};

/// Trait for entity store operations needed by the membership core.
///
/// All calls may block on network or disk; implementations must tolerate
/// arbitrary interleaving of concurrent calls.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Resolves an authorizable by id. `Ok(None)` when the id is unknown.
    async fn resolve(&self, id: &AuthorizableId) -> DomainResult<Option<Authorizable>>;

    /// Returns the declared (one-level) member ids of a group, in order.
    async fn declared_members(&self, group: &Group) -> DomainResult<Vec<AuthorizableId>>;

    /// The store's own transitive membership predicate: is `candidate`
    /// reachable from `group` through zero or more nested groups.
    async fn is_transitive_member(
        &self,
        group: &Group,
        candidate: &AuthorizableId,
    ) -> DomainResult<bool>;

    /// Groups the user is a direct member of.
    async fn member_of(&self, user: &User) -> DomainResult<Vec<Group>>;

    /// Gets a content node by absolute path.
    async fn node(&self, path: &str) -> DomainResult<Option<ContentNode>>;

    /// Returns the deepest existing node on `path`, walking towards the root.
    ///
    /// Default implementation checks each ancestor with [`EntityStore::node`].
    async fn first_existing_node(&self, path: &str) -> DomainResult<Option<ContentNode>> {
        let mut current = Some(path);
        while let Some(candidate) = current {
            if let Some(node) = self.node(candidate).await? {
                return Ok(Some(node));
            }
            current = parent_path(candidate);
        }
        Ok(None)
    }

    /// Containment query: nodes of `resource_type` whose path or text
    /// contains `text`.
    async fn find_nodes(&self, resource_type: &str, text: &str) -> DomainResult<Vec<ContentNode>>;

    /// Adds `member` to the group's declared members. Returns `false` if it
    /// was already a member.
    async fn add_member(&self, group: &Group, member: &AuthorizableId) -> DomainResult<bool>;

    /// Removes `member` from the group's declared members. Returns `false`
    /// if it was not a member.
    async fn remove_member(&self, group: &Group, member: &AuthorizableId) -> DomainResult<bool>;
}

/// Trait for profile lookups.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Gets the profile of a user. `Ok(None)` when no profile exists.
    async fn profile_of(&self, user_id: &AuthorizableId) -> DomainResult<Option<Profile>>;
}

/// Kinds of site events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SiteEventKind {
    JoinedSite,
    UnjoinedSite,
    StartJoinWorkflow,
}

/// An event emitted by join/unjoin operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEvent {
    pub kind: SiteEventKind,
    /// Path of the site.
    pub site: String,
    pub group: AuthorizableId,
    /// The acting user.
    pub user: AuthorizableId,
}

/// Fire-and-forget event sink. No acknowledgement is consumed.
pub trait EventSink: Send + Sync {
    fn post(&self, event: SiteEvent);
}

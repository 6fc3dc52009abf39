//! Membership records and the membership graph built for a site.

use indexmap::IndexMap;

use crate::model::{Authorizable, AuthorizableId, Group};

use super::key::{AuthorizableKey, GroupKey, UserKey};

/// Why an entity is in a membership graph: the group whose expansion
/// discovered it, or `None` when the site declared it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub parent: Option<Group>,
    pub authorizable: Authorizable,
}

impl Membership {
    pub fn new(parent: Option<Group>, authorizable: impl Into<Authorizable>) -> Self {
        Self {
            parent,
            authorizable: authorizable.into(),
        }
    }

    /// Whether the entity was declared on the site directly.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn parent_id(&self) -> Option<&AuthorizableId> {
        self.parent.as_ref().map(|group| &group.id)
    }
}

/// Groups and users transitively reachable from a site's declared
/// authorizables, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct MembershipGraph {
    pub(crate) groups: IndexMap<GroupKey, Membership>,
    pub(crate) users: IndexMap<UserKey, Membership>,
    pub(crate) partial: bool,
}

impl MembershipGraph {
    pub fn groups(&self) -> &IndexMap<GroupKey, Membership> {
        &self.groups
    }

    pub fn users(&self) -> &IndexMap<UserKey, Membership> {
        &self.users
    }

    /// Whether expansion stopped early because a size cap was reached.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn group_membership(&self, id: &AuthorizableId) -> Option<&Membership> {
        self.groups.get(id)
    }

    pub fn user_membership(&self, id: &AuthorizableId) -> Option<&Membership> {
        self.users.get(id)
    }

    pub fn contains_group(&self, id: &AuthorizableId) -> bool {
        self.groups.contains_key(id)
    }

    pub fn contains_user(&self, id: &AuthorizableId) -> bool {
        self.users.contains_key(id)
    }

    /// Consumes the graph, returning group keys in discovery order.
    pub fn into_group_keys(self) -> Vec<GroupKey> {
        self.groups.into_keys().collect()
    }

    /// Consumes the graph, returning user keys in discovery order.
    pub fn into_user_keys(self) -> Vec<UserKey> {
        self.users.into_keys().collect()
    }

    /// Ids of every entity in the graph, groups first.
    pub fn ids(&self) -> impl Iterator<Item = &AuthorizableId> {
        self.groups
            .keys()
            .map(AuthorizableKey::id)
            .chain(self.users.keys().map(AuthorizableKey::id))
    }
}

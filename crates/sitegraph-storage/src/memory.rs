//! In-memory entity and profile store.
//!
//! Backs the membership core in tests and in the command-line front end.
//! All maps are `DashMap`s, so concurrent readers never block each other
//! and join/unjoin mutations lock a single group's member list.

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, instrument};

use sitegraph_domain::model::{Authorizable, AuthorizableId, ContentNode, Group, Profile, User};
use sitegraph_domain::{DomainResult, EntityStore, ProfileStore};

use crate::error::{StorageError, StorageResult};
use crate::fixture::Fixture;

/// In-memory implementation of [`EntityStore`] and [`ProfileStore`].
///
/// # Performance Characteristics
///
/// - **Resolve / node lookup / profile lookup**: O(1) average
/// - **Transitive membership**: O(groups + memberships) breadth-first walk
/// - **Direct groups of a user / containment query**: O(N) linear scan
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    authorizables: DashMap<AuthorizableId, Authorizable>,
    /// Declared member ids keyed by group id, in declaration order.
    members: DashMap<AuthorizableId, Vec<AuthorizableId>>,
    nodes: DashMap<String, ContentNode>,
    profiles: DashMap<AuthorizableId, Profile>,
}

impl MemoryEntityStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty store wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Builds a store from parsed fixture contents.
    pub fn from_fixture(fixture: Fixture) -> StorageResult<Self> {
        let store = Self::new();
        for user in fixture.users {
            store.insert_user(user)?;
        }
        for entry in fixture.groups {
            store.insert_group(entry.group, entry.members)?;
        }
        for other in fixture.others {
            store.insert_authorizable(Authorizable::Other {
                id: other.id,
                type_name: other.type_name,
            })?;
        }
        for profile in fixture.profiles {
            store.insert_profile(profile);
        }
        for node in fixture.nodes {
            store.insert_node(node)?;
        }
        debug!(
            authorizables = store.authorizables.len(),
            nodes = store.nodes.len(),
            profiles = store.profiles.len(),
            "Loaded fixture into memory store"
        );
        Ok(store)
    }

    pub fn from_json(json: &str) -> StorageResult<Self> {
        Self::from_fixture(Fixture::from_json(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::from_fixture(Fixture::from_path(path)?)
    }

    pub fn insert_user(&self, user: User) -> StorageResult<()> {
        self.insert_authorizable(user.into())
    }

    /// Inserts a group with its declared members. Members need not exist yet.
    pub fn insert_group(
        &self,
        group: Group,
        members: impl IntoIterator<Item = AuthorizableId>,
    ) -> StorageResult<()> {
        let id = group.id.clone();
        self.insert_authorizable(group.into())?;
        self.members.insert(id, members.into_iter().collect());
        Ok(())
    }

    fn insert_authorizable(&self, authorizable: Authorizable) -> StorageResult<()> {
        validate_id(authorizable.id())?;
        match self.authorizables.entry(authorizable.id().clone()) {
            Entry::Occupied(entry) => Err(StorageError::DuplicateEntity {
                id: entry.key().to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(authorizable);
                Ok(())
            }
        }
    }

    /// Inserts or replaces a profile.
    pub fn insert_profile(&self, profile: Profile) {
        self.profiles.insert(profile.user_id.clone(), profile);
    }

    /// Inserts a content node. Paths must be absolute and unique.
    pub fn insert_node(&self, node: ContentNode) -> StorageResult<()> {
        if !node.path.starts_with('/') {
            return Err(StorageError::InvalidInput {
                message: format!("node path must be absolute: {}", node.path),
            });
        }
        match self.nodes.entry(node.path.clone()) {
            Entry::Occupied(entry) => Err(StorageError::DuplicateEntity {
                id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(node);
                Ok(())
            }
        }
    }

    fn declared(&self, group_id: &AuthorizableId) -> Vec<AuthorizableId> {
        self.members
            .get(group_id)
            .map(|m| m.value().clone())
            .unwrap_or_default()
    }

    fn require_group(&self, group: &Group) -> StorageResult<()> {
        match self.authorizables.get(&group.id) {
            Some(entry) if entry.value().as_group().is_some() => Ok(()),
            _ => Err(StorageError::EntityNotFound {
                id: group.id.to_string(),
            }),
        }
    }
}

fn validate_id(id: &AuthorizableId) -> StorageResult<()> {
    if id.as_str().trim().is_empty() {
        return Err(StorageError::InvalidInput {
            message: "authorizable id cannot be empty".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn resolve(&self, id: &AuthorizableId) -> DomainResult<Option<Authorizable>> {
        Ok(self.authorizables.get(id).map(|a| a.value().clone()))
    }

    async fn declared_members(&self, group: &Group) -> DomainResult<Vec<AuthorizableId>> {
        Ok(self.declared(&group.id))
    }

    #[instrument(skip(self, group), fields(group_id = %group.id))]
    async fn is_transitive_member(
        &self,
        group: &Group,
        candidate: &AuthorizableId,
    ) -> DomainResult<bool> {
        let mut visited: HashSet<AuthorizableId> = HashSet::new();
        let mut queue: VecDeque<AuthorizableId> = VecDeque::from([group.id.clone()]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for member in self.declared(&current) {
                if &member == candidate {
                    return Ok(true);
                }
                if self.members.contains_key(&member) {
                    queue.push_back(member);
                }
            }
        }
        Ok(false)
    }

    async fn member_of(&self, user: &User) -> DomainResult<Vec<Group>> {
        let mut groups: Vec<Group> = self
            .members
            .iter()
            .filter(|entry| entry.value().contains(&user.id))
            .filter_map(|entry| {
                self.authorizables
                    .get(entry.key())
                    .and_then(|a| a.value().as_group().cloned())
            })
            .collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(groups)
    }

    async fn node(&self, path: &str) -> DomainResult<Option<ContentNode>> {
        Ok(self.nodes.get(path).map(|n| n.value().clone()))
    }

    async fn find_nodes(&self, resource_type: &str, text: &str) -> DomainResult<Vec<ContentNode>> {
        let needle = text.to_lowercase();
        let mut found: Vec<ContentNode> = self
            .nodes
            .iter()
            .filter(|entry| entry.value().resource_type.as_deref() == Some(resource_type))
            .filter(|entry| {
                let node = entry.value();
                node.path.to_lowercase().contains(&needle)
                    || node.text.to_lowercase().contains(&needle)
            })
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(found)
    }

    async fn add_member(&self, group: &Group, member: &AuthorizableId) -> DomainResult<bool> {
        self.require_group(group)?;
        let mut declared = self.members.entry(group.id.clone()).or_default();
        if declared.contains(member) {
            return Ok(false);
        }
        declared.push(member.clone());
        Ok(true)
    }

    async fn remove_member(&self, group: &Group, member: &AuthorizableId) -> DomainResult<bool> {
        self.require_group(group)?;
        let Some(mut declared) = self.members.get_mut(&group.id) else {
            return Ok(false);
        };
        let before = declared.len();
        declared.retain(|m| m != member);
        Ok(declared.len() != before)
    }
}

#[async_trait]
impl ProfileStore for MemoryEntityStore {
    async fn profile_of(&self, user_id: &AuthorizableId) -> DomainResult<Option<Profile>> {
        Ok(self.profiles.get(user_id).map(|p| p.value().clone()))
    }
}

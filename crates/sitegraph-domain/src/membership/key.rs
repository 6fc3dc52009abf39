//! Identity-bearing keys for membership mappings.
//!
//! Keys compare and hash by the underlying entity id only, so two handles to
//! the same logical group or user collapse into one node.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use crate::error::{DomainError, DomainResult};
use crate::model::{AuthorizableId, Group, Profile, User};

use super::traits::ProfileStore;

/// Common view over group and user keys used by ranking and pagination.
pub trait AuthorizableKey {
    /// The entity handed back when a key is unwrapped.
    type Entity;

    fn id(&self) -> &AuthorizableId;

    /// Cached first name; `None` for keys that have no names.
    fn first_name(&self) -> Option<&str> {
        None
    }

    /// Cached last name; `None` for keys that have no names.
    fn last_name(&self) -> Option<&str> {
        None
    }

    fn into_entity(self) -> Self::Entity;
}

/// Key wrapping a [`Group`].
#[derive(Debug, Clone)]
pub struct GroupKey {
    group: Group,
}

impl GroupKey {
    pub fn new(group: Group) -> Self {
        Self { group }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }
}

impl AuthorizableKey for GroupKey {
    type Entity = Group;

    fn id(&self) -> &AuthorizableId {
        &self.group.id
    }

    fn into_entity(self) -> Group {
        self.group
    }
}

/// Key wrapping a [`User`] with the profile fields needed for ranking.
#[derive(Debug, Clone)]
pub struct UserKey {
    user: User,
    first_name: String,
    last_name: String,
}

impl UserKey {
    /// Creates a key from an already fetched profile. Missing name fields
    /// are cached as empty strings.
    pub fn new(user: User, profile: &Profile) -> Self {
        Self {
            user,
            first_name: profile.first_name.clone().unwrap_or_default(),
            last_name: profile.last_name.clone().unwrap_or_default(),
        }
    }

    /// Creates a key, fetching the user's profile.
    ///
    /// Fails with [`DomainError::ProfileNotFound`] when the store has no
    /// profile for the user.
    pub async fn fetch<P>(user: User, profiles: &P) -> DomainResult<Self>
    where
        P: ProfileStore + ?Sized,
    {
        let profile = profiles
            .profile_of(&user.id)
            .await?
            .ok_or_else(|| DomainError::ProfileNotFound {
                user_id: user.id.to_string(),
            })?;
        Ok(Self::new(user, &profile))
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

impl AuthorizableKey for UserKey {
    type Entity = User;

    fn id(&self) -> &AuthorizableId {
        &self.user.id
    }

    fn first_name(&self) -> Option<&str> {
        Some(&self.first_name)
    }

    fn last_name(&self) -> Option<&str> {
        Some(&self.last_name)
    }

    fn into_entity(self) -> User {
        self.user
    }
}

// Equality and hashing go through the id alone; `Borrow<AuthorizableId>`
// relies on the hash matching `AuthorizableId::hash`.
macro_rules! impl_key_identity {
    ($key:ty) => {
        impl PartialEq for $key {
            fn eq(&self, other: &Self) -> bool {
                self.id() == other.id()
            }
        }

        impl Eq for $key {}

        impl Hash for $key {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id().hash(state);
            }
        }

        impl Borrow<AuthorizableId> for $key {
            fn borrow(&self) -> &AuthorizableId {
                self.id()
            }
        }
    };
}

impl_key_identity!(GroupKey);
impl_key_identity!(UserKey);

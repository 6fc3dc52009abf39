//! Core type definitions for authorizables, content nodes and profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resource type tag carried by site nodes.
pub const SITE_RESOURCE_TYPE: &str = "sakai/site";

/// Resource type tag of a container node holding many sites.
pub const SITES_CONTAINER_RESOURCE_TYPE: &str = "sakai/sites";

/// Template used when a site declares none.
pub const DEFAULT_SITE_TEMPLATE: &str = "/sites/default.html";

/// Identifier of a user or group (e.g., "alice", "g-physics-101").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizableId(String);

impl AuthorizableId {
    /// Creates a new identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorizableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthorizableId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AuthorizableId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A user: a leaf authorizable with no members of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: AuthorizableId,
}

impl User {
    pub fn new(id: impl Into<AuthorizableId>) -> Self {
        Self { id: id.into() }
    }
}

/// A group of authorizables.
///
/// Declared members are held by the entity store, not by this value; a
/// `Group` only carries the attributes the core reads directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: AuthorizableId,
    /// Raw joinability attribute ("yes", "no", "withAuth").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joinable: Option<String>,
    /// Paths of the sites this group is declared for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sites: Vec<String>,
}

impl Group {
    pub fn new(id: impl Into<AuthorizableId>) -> Self {
        Self {
            id: id.into(),
            joinable: None,
            sites: Vec::new(),
        }
    }

    pub fn with_joinable(mut self, joinable: impl Into<String>) -> Self {
        self.joinable = Some(joinable.into());
        self
    }

    pub fn with_sites<I, S>(mut self, sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sites = sites.into_iter().map(Into::into).collect();
        self
    }
}

/// Any identity entity known to the entity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Authorizable {
    User(User),
    Group(Group),
    /// An authorizable kind this crate does not understand.
    Other {
        id: AuthorizableId,
        type_name: String,
    },
}

impl Authorizable {
    pub fn id(&self) -> &AuthorizableId {
        match self {
            Authorizable::User(user) => &user.id,
            Authorizable::Group(group) => &group.id,
            Authorizable::Other { id, .. } => id,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Authorizable::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Authorizable::User(user) => Some(user),
            _ => None,
        }
    }
}

impl From<User> for Authorizable {
    fn from(user: User) -> Self {
        Authorizable::User(user)
    }
}

impl From<Group> for Authorizable {
    fn from(group: Group) -> Self {
        Authorizable::Group(group)
    }
}

/// Whether joining a site or group is immediate, forbidden, or needs approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Joinable {
    #[serde(rename = "yes")]
    Yes,
    #[default]
    #[serde(rename = "no")]
    No,
    #[serde(rename = "withAuth")]
    WithAuth,
}

impl Joinable {
    /// Parses a raw attribute value, failing closed to [`Joinable::No`].
    /// Only the exact spellings `yes`, `no` and `withAuth` are accepted.
    pub fn from_attribute(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Joinable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Joinable::Yes),
            "no" => Ok(Joinable::No),
            "withAuth" => Ok(Joinable::WithAuth),
            _ => Err(format!("unknown joinable value: {s}")),
        }
    }
}

impl fmt::Display for Joinable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Joinable::Yes => "yes",
            Joinable::No => "no",
            Joinable::WithAuth => "withAuth",
        })
    }
}

/// A node in the content tree. Sites are nodes tagged with [`SITE_RESOURCE_TYPE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    /// Absolute path (e.g., "/sites/physics").
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Declared authorizables, in declaration order. `None` when the
    /// attribute is absent altogether.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizables: Option<Vec<AuthorizableId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joinable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<String>,
    /// Free text (title, description) matched by containment queries.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl ContentNode {
    /// Creates an untagged node at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Creates a site node declaring the given authorizables.
    pub fn site<I, S>(path: impl Into<String>, authorizables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AuthorizableId>,
    {
        Self {
            path: path.into(),
            resource_type: Some(SITE_RESOURCE_TYPE.to_string()),
            authorizables: Some(authorizables.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn with_joinable(mut self, joinable: impl Into<String>) -> Self {
        self.joinable = Some(joinable.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_skin(mut self, skin: impl Into<String>) -> Self {
        self.skin = Some(skin.into());
        self
    }

    pub fn as_template(mut self) -> Self {
        self.is_template = Some(true);
        self
    }

    /// Last path segment ("physics" for "/sites/physics").
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Declared authorizable ids, empty when the attribute is absent.
    pub fn declared_authorizables(&self) -> &[AuthorizableId] {
        self.authorizables.as_deref().unwrap_or_default()
    }
}

/// Returns the parent of an absolute path, or `None` for the root.
pub fn parent_path(path: &str) -> Option<&str> {
    if path == "/" || path.is_empty() {
        return None;
    }
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => Some("/"),
        Some(idx) => Some(&trimmed[..idx]),
        None => None,
    }
}

/// Profile record of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: AuthorizableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Profile {
    pub fn new(
        user_id: impl Into<AuthorizableId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: None,
        }
    }
}

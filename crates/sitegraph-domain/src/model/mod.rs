//! Data model: authorizables, content nodes, profiles and sort specifications.

mod sort;
mod types;

pub use sort::{Sort, SortField, SortOrder};
pub use types::{
    parent_path, Authorizable, AuthorizableId, ContentNode, Group, Joinable, Profile, User,
    DEFAULT_SITE_TEMPLATE, SITES_CONTAINER_RESOURCE_TYPE, SITE_RESOURCE_TYPE,
};

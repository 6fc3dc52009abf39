//! Site service: membership queries, join/unjoin and site lookups.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::{DomainError, DomainResult};
use crate::membership::{
    Comparator, EntityStore, EventSink, GroupKey, MembershipConfig, MembershipGraphBuilder, Page,
    ProfileStore, SiteEvent, SiteEventKind, UserKey,
};
use crate::model::{
    parent_path, Authorizable, AuthorizableId, ContentNode, Group, Joinable, Sort, User,
    DEFAULT_SITE_TEMPLATE, SITES_CONTAINER_RESOURCE_TYPE, SITE_RESOURCE_TYPE,
};

/// Number of users in a site's membership graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemberCount {
    pub count: usize,
    /// Set when the graph hit the size cap, so `count` is a lower bound.
    pub partial: bool,
}

/// Façade over the membership graph builder and the entity store.
///
/// Holds no per-call state; every listing rebuilds the membership graph.
pub struct SiteService<E: ?Sized, P: ?Sized> {
    entity_store: Arc<E>,
    events: Arc<dyn EventSink>,
    builder: MembershipGraphBuilder<E, P>,
}

impl<E, P> SiteService<E, P>
where
    E: EntityStore + ?Sized,
    P: ProfileStore + ?Sized,
{
    /// Creates a new service with default membership configuration.
    pub fn new(entity_store: Arc<E>, profile_store: Arc<P>, events: Arc<dyn EventSink>) -> Self {
        Self::with_config(entity_store, profile_store, events, MembershipConfig::default())
    }

    /// Creates a new service with custom membership configuration.
    pub fn with_config(
        entity_store: Arc<E>,
        profile_store: Arc<P>,
        events: Arc<dyn EventSink>,
        config: MembershipConfig,
    ) -> Self {
        let builder =
            MembershipGraphBuilder::with_config(Arc::clone(&entity_store), profile_store, config);
        Self {
            entity_store,
            events,
            builder,
        }
    }

    pub fn is_site(&self, node: &ContentNode) -> bool {
        node.resource_type.as_deref() == Some(SITE_RESOURCE_TYPE)
    }

    pub fn is_site_template(&self, node: &ContentNode) -> bool {
        node.is_template.unwrap_or(false)
    }

    pub fn get_joinable(&self, site: &ContentNode) -> Joinable {
        Joinable::from_attribute(site.joinable.as_deref())
    }

    /// Joinability of a group; anything that is not a group is `No`.
    pub fn get_group_joinable(&self, authorizable: &Authorizable) -> Joinable {
        authorizable
            .as_group()
            .map(|group| Joinable::from_attribute(group.joinable.as_deref()))
            .unwrap_or_default()
    }

    /// Whether `candidate` is associated with the site.
    ///
    /// A direct match against the declared ids is tried first, then the
    /// store's transitive predicate for each declared group. Store errors
    /// count as "not a member".
    pub async fn is_member(&self, site: &ContentNode, candidate: &AuthorizableId) -> bool {
        match self.check_member(site, candidate).await {
            Ok(found) => found,
            Err(e) => {
                warn!(
                    site = %site.path,
                    candidate = %candidate,
                    error = %e,
                    "Membership check failed"
                );
                false
            }
        }
    }

    async fn check_member(
        &self,
        site: &ContentNode,
        candidate: &AuthorizableId,
    ) -> DomainResult<bool> {
        let declared = site.declared_authorizables();
        if declared.contains(candidate) {
            return Ok(true);
        }
        for id in declared {
            if let Some(Authorizable::Group(group)) = self.entity_store.resolve(id).await? {
                if self.entity_store.is_transitive_member(&group, candidate).await? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Joins `user_id` to the site through `group_id`.
    ///
    /// When both the group and the site are openly joinable the user is added
    /// to the group and a `JoinedSite` event is posted. Otherwise a
    /// `StartJoinWorkflow` event is posted and membership is left unchanged.
    #[instrument(skip(self, site), fields(site = %site.path))]
    pub async fn join_site(
        &self,
        site: &ContentNode,
        user_id: &AuthorizableId,
        group_id: &AuthorizableId,
    ) -> DomainResult<()> {
        let user = self.require_user(user_id).await?;
        if self.is_member(site, &user.id).await {
            return Err(DomainError::conflict(
                "The current user is already a member of the site",
            ));
        }

        let site_join = self.get_joinable(site);
        let group = self.resolve_group(group_id).await?;
        let group_join = Joinable::from_attribute(group.joinable.as_deref());

        if !self.is_member(site, &group.id).await {
            return Err(DomainError::invalid_argument(format!(
                "The target group {} is not a member of the site {}",
                group.id, site.path
            )));
        }
        if group_join == Joinable::No {
            return Err(DomainError::conflict("The group is not joinable"));
        }
        if site_join == Joinable::No {
            return Err(DomainError::conflict("The site is not joinable"));
        }

        if group_join == Joinable::Yes && site_join == Joinable::Yes {
            self.entity_store.add_member(&group, &user.id).await?;
            info!(user_id = %user.id, group_id = %group.id, "User joined site");
            self.post(SiteEventKind::JoinedSite, site, &group, &user);
        } else {
            info!(
                user_id = %user.id,
                group_id = %group.id,
                site_joinable = %site_join,
                group_joinable = %group_join,
                "Join requires approval, starting workflow"
            );
            self.post(SiteEventKind::StartJoinWorkflow, site, &group, &user);
        }
        Ok(())
    }

    /// Removes `user_id` from `group_id`, which must be associated with the site.
    #[instrument(skip(self, site), fields(site = %site.path))]
    pub async fn unjoin_site(
        &self,
        site: &ContentNode,
        user_id: &AuthorizableId,
        group_id: &AuthorizableId,
    ) -> DomainResult<()> {
        if !self.is_site(site) {
            return Err(DomainError::invalid_argument(format!(
                "{} is not a site",
                site.path
            )));
        }
        let group = self.resolve_group(group_id).await?;
        if !self.is_member(site, &group.id).await {
            return Err(DomainError::conflict(format!(
                "{} is not associated with {}",
                group.id, site.path
            )));
        }
        let user = self.require_user(user_id).await?;

        if !self.entity_store.remove_member(&group, &user.id).await? {
            return Err(DomainError::conflict(format!(
                "User {} was not a member of {}",
                user.id, group.id
            )));
        }
        info!(user_id = %user.id, group_id = %group.id, "User left site");
        self.post(SiteEventKind::UnjoinedSite, site, &group, &user);
        Ok(())
    }

    async fn require_user(&self, user_id: &AuthorizableId) -> DomainResult<User> {
        match self.entity_store.resolve(user_id).await? {
            Some(Authorizable::User(user)) => Ok(user),
            _ => Err(DomainError::conflict(format!(
                "Not a user that is known to the system: {user_id}"
            ))),
        }
    }

    async fn resolve_group(&self, group_id: &AuthorizableId) -> DomainResult<Group> {
        match self.entity_store.resolve(group_id).await? {
            Some(Authorizable::Group(group)) => Ok(group),
            _ => Err(DomainError::invalid_argument(format!(
                "The target group must be an existing group, got {group_id}"
            ))),
        }
    }

    fn post(&self, kind: SiteEventKind, site: &ContentNode, group: &Group, user: &User) {
        self.events.post(SiteEvent {
            kind,
            site: site.path.clone(),
            group: group.id.clone(),
            user: user.id.clone(),
        });
    }

    /// Users of the site, ranked by `sorts` (discovery order when empty),
    /// starting at `start` and yielding at most `items`.
    pub async fn get_members(
        &self,
        site: &ContentNode,
        start: usize,
        items: usize,
        sorts: &[Sort],
    ) -> DomainResult<Page<UserKey>> {
        let graph = self.builder.build(site).await?;
        let partial = graph.is_partial();
        let mut keys = graph.into_user_keys();
        Comparator::new(sorts).sort(&mut keys);
        Ok(Page::new(keys, start, items).with_partial(partial))
    }

    /// Groups of the site, ranked and paginated like [`get_members`](Self::get_members).
    pub async fn get_groups(
        &self,
        site: &ContentNode,
        start: usize,
        items: usize,
        sorts: &[Sort],
    ) -> DomainResult<Page<GroupKey>> {
        let graph = self.builder.build(site).await?;
        let partial = graph.is_partial();
        let mut keys = graph.into_group_keys();
        Comparator::new(sorts).sort(&mut keys);
        Ok(Page::new(keys, start, items).with_partial(partial))
    }

    pub async fn get_member_count(&self, site: &ContentNode) -> DomainResult<MemberCount> {
        let graph = self.builder.build(site).await?;
        Ok(MemberCount {
            count: graph.users().len(),
            partial: graph.is_partial(),
        })
    }

    /// Sites the user belongs to through direct group membership, keyed by
    /// site path, with the groups that link the user to each site.
    ///
    /// Ids that do not resolve to a user yield an empty map.
    pub async fn get_membership(
        &self,
        user_id: &AuthorizableId,
    ) -> DomainResult<IndexMap<String, Vec<Group>>> {
        let mut sites: IndexMap<String, Vec<Group>> = IndexMap::new();
        let Some(Authorizable::User(user)) = self.entity_store.resolve(user_id).await? else {
            return Ok(sites);
        };
        for group in self.entity_store.member_of(&user).await? {
            for site in &group.sites {
                sites.entry(site.clone()).or_default().push(group.clone());
            }
        }
        Ok(sites)
    }

    /// Finds the site a path belongs to.
    ///
    /// Starts at the deepest existing node on `path` and walks towards the
    /// root. A sites container is checked for a child named after the last
    /// segment of `path`. Errors with `NotFound` when no node on the path
    /// exists at all.
    #[instrument(skip(self))]
    pub async fn find_site_by_path(&self, path: &str) -> DomainResult<Option<ContentNode>> {
        let Some(node) = self.entity_store.first_existing_node(path).await? else {
            return Err(DomainError::NotFound {
                id: path.to_string(),
            });
        };
        let site_name = path.rsplit('/').next().unwrap_or_default();

        match self.walk_to_site(node, site_name).await {
            Ok(Some(site)) => return Ok(Some(site)),
            Ok(None) => {}
            Err(e) => warn!(path = %path, error = %e, "Unable to retrieve site"),
        }
        info!(path = %path, "No site found");
        Ok(None)
    }

    async fn walk_to_site(
        &self,
        mut node: ContentNode,
        site_name: &str,
    ) -> DomainResult<Option<ContentNode>> {
        while node.path != "/" {
            if self.is_site(&node) {
                return Ok(Some(node));
            }
            if node.resource_type.as_deref() == Some(SITES_CONTAINER_RESOURCE_TYPE) {
                let child = format!("{}/{}", node.path.trim_end_matches('/'), site_name);
                if let Some(candidate) = self.entity_store.node(&child).await? {
                    if self.is_site(&candidate) {
                        return Ok(Some(candidate));
                    }
                }
            }
            let Some(parent) = parent_path(&node.path) else {
                break;
            };
            match self.entity_store.first_existing_node(parent).await? {
                Some(next) => node = next,
                None => break,
            }
        }
        Ok(None)
    }

    /// Finds the first site whose content matches `name`.
    #[instrument(skip(self))]
    pub async fn find_site_by_name(&self, name: &str) -> DomainResult<Option<ContentNode>> {
        match self.entity_store.find_nodes(SITE_RESOURCE_TYPE, name).await {
            Ok(nodes) => {
                if let Some(site) = nodes.into_iter().find(|node| self.is_site(node)) {
                    return Ok(Some(site));
                }
            }
            Err(e) => warn!(name = %name, error = %e, "Unable to retrieve site"),
        }
        info!(name = %name, "No site found");
        Ok(None)
    }

    pub fn get_site_template(&self, site: &ContentNode) -> String {
        site.template
            .clone()
            .unwrap_or_else(|| DEFAULT_SITE_TEMPLATE.to_string())
    }

    pub fn get_site_skin(&self, site: &ContentNode) -> String {
        site.skin
            .clone()
            .unwrap_or_else(|| DEFAULT_SITE_TEMPLATE.to_string())
    }

    pub fn get_default_site_template(&self) -> &'static str {
        DEFAULT_SITE_TEMPLATE
    }
}

//! Membership graph builder.
//!
//! Expands a site's declared authorizables into every group and user
//! reachable through nested group membership.
//!
//! # Traversal
//!
//! - **Cycle safety**: the `groups` mapping doubles as the visited set. Each
//!   group is checked through its [`GroupKey`] (entity id), so two handles to
//!   the same group are one node and cycles terminate.
//! - **Order**: depth-first pre-order. A nested group is expanded fully
//!   before its parent's remaining members; the first path that reaches an
//!   entity is the one recorded.
//! - **Explicit stack**: expansion keeps its own frame stack instead of
//!   recursing, so deep hierarchies cannot exhaust the call stack.
//! - **Size cap**: checked before every insertion. Reaching
//!   [`MembershipConfig::max_list_size`] stops the whole expansion and marks
//!   the graph partial.
//!
//! # Failure policy
//!
//! Unknown ids and entity store errors for individual entities are logged
//! and skipped. A missing profile is fatal to the call, since ranking on
//! absent display fields would be silently wrong.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::vec;

use tracing::{debug, info, instrument, warn};

use crate::error::DomainResult;
use crate::model::{Authorizable, AuthorizableId, ContentNode, Group, User};

use super::config::MembershipConfig;
use super::key::{GroupKey, UserKey};
use super::record::{Membership, MembershipGraph};
use super::traits::{EntityStore, ProfileStore};

/// Outcome of trying to put one entity into the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    Inserted,
    Duplicate,
    Capped,
}

/// A group whose declared members are being walked.
struct Frame {
    group: Group,
    members: vec::IntoIter<AuthorizableId>,
}

/// Builds [`MembershipGraph`]s from the entity and profile stores.
///
/// Stateless: every call to [`build`](Self::build) starts from scratch.
pub struct MembershipGraphBuilder<E: ?Sized, P: ?Sized> {
    entity_store: Arc<E>,
    profile_store: Arc<P>,
    config: MembershipConfig,
}

impl<E, P> MembershipGraphBuilder<E, P>
where
    E: EntityStore + ?Sized,
    P: ProfileStore + ?Sized,
{
    /// Creates a new builder with default configuration.
    pub fn new(entity_store: Arc<E>, profile_store: Arc<P>) -> Self {
        Self::with_config(entity_store, profile_store, MembershipConfig::default())
    }

    /// Creates a new builder with custom configuration.
    pub fn with_config(
        entity_store: Arc<E>,
        profile_store: Arc<P>,
        config: MembershipConfig,
    ) -> Self {
        Self {
            entity_store,
            profile_store,
            config,
        }
    }

    /// Builds the membership graph of `site`.
    ///
    /// A site without a declared-authorizables attribute yields an empty
    /// graph. Errors only when a reachable user's profile cannot be loaded.
    #[instrument(skip_all, fields(site = %site.path))]
    pub async fn build(&self, site: &ContentNode) -> DomainResult<MembershipGraph> {
        let mut graph = MembershipGraph::default();

        let Some(declared) = site.authorizables.as_deref() else {
            info!(
                site = %site.path,
                "Site has no declared authorizables and thus has no memberships"
            );
            return Ok(graph);
        };

        for id in declared {
            let Some(authorizable) = self.resolve_or_skip(id, None).await else {
                continue;
            };
            let flow = match authorizable {
                Authorizable::Group(group) => {
                    match self.insert_group(&mut graph, None, &group) {
                        Admission::Inserted => self.expand(&mut graph, group).await?,
                        Admission::Duplicate => ControlFlow::Continue(()),
                        Admission::Capped => ControlFlow::Break(()),
                    }
                }
                Authorizable::User(user) => self.admit_user(&mut graph, None, user).await?,
                Authorizable::Other { id, type_name } => {
                    warn!(
                        site = %site.path,
                        authorizable = %id,
                        kind = %type_name,
                        "Cannot handle authorizable kind, skipping"
                    );
                    ControlFlow::Continue(())
                }
            };
            if flow.is_break() {
                break;
            }
        }

        debug!(
            site = %site.path,
            groups = graph.groups.len(),
            users = graph.users.len(),
            partial = graph.partial,
            "Built membership graph"
        );
        Ok(graph)
    }

    /// Expands `root` (already in the graph) depth-first.
    async fn expand(
        &self,
        graph: &mut MembershipGraph,
        root: Group,
    ) -> DomainResult<ControlFlow<()>> {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.open_frame(root).await {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            let Some(member_id) = frame.members.next() else {
                stack.pop();
                continue;
            };
            let parent = frame.group.clone();

            let Some(member) = self.resolve_or_skip(&member_id, Some(&parent)).await else {
                continue;
            };
            match member {
                Authorizable::Group(group) => {
                    match self.insert_group(graph, Some(&parent), &group) {
                        Admission::Inserted => {
                            if let Some(frame) = self.open_frame(group).await {
                                stack.push(frame);
                            }
                        }
                        Admission::Duplicate => {}
                        Admission::Capped => return Ok(ControlFlow::Break(())),
                    }
                }
                Authorizable::User(user) => {
                    if self.admit_user(graph, Some(&parent), user).await?.is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
                Authorizable::Other { id, type_name } => {
                    warn!(
                        group_id = %parent.id,
                        authorizable = %id,
                        kind = %type_name,
                        "Cannot handle authorizable kind, skipping"
                    );
                }
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    /// Reads a group's declared members. A store failure skips the group's
    /// expansion; the group itself stays in the graph.
    async fn open_frame(&self, group: Group) -> Option<Frame> {
        match self.entity_store.declared_members(&group).await {
            Ok(members) => Some(Frame {
                group,
                members: members.into_iter(),
            }),
            Err(e) => {
                warn!(
                    group_id = %group.id,
                    error = %e,
                    "Failed to read declared members, skipping expansion"
                );
                None
            }
        }
    }

    async fn resolve_or_skip(
        &self,
        id: &AuthorizableId,
        parent: Option<&Group>,
    ) -> Option<Authorizable> {
        let parent_id = parent.map(|group| group.id.as_str()).unwrap_or_default();
        match self.entity_store.resolve(id).await {
            Ok(Some(authorizable)) => Some(authorizable),
            Ok(None) => {
                warn!(
                    authorizable = %id,
                    parent = %parent_id,
                    "Authorizable could not be resolved, skipping"
                );
                None
            }
            Err(e) => {
                warn!(
                    authorizable = %id,
                    parent = %parent_id,
                    error = %e,
                    "Failed to resolve authorizable, skipping"
                );
                None
            }
        }
    }

    fn insert_group(
        &self,
        graph: &mut MembershipGraph,
        parent: Option<&Group>,
        group: &Group,
    ) -> Admission {
        if graph.groups.contains_key(&group.id) {
            return Admission::Duplicate;
        }
        if graph.groups.len() >= self.config.max_list_size {
            self.mark_partial(graph, parent);
            return Admission::Capped;
        }
        graph.groups.insert(
            GroupKey::new(group.clone()),
            Membership::new(parent.cloned(), group.clone()),
        );
        Admission::Inserted
    }

    async fn admit_user(
        &self,
        graph: &mut MembershipGraph,
        parent: Option<&Group>,
        user: User,
    ) -> DomainResult<ControlFlow<()>> {
        if graph.users.contains_key(&user.id) {
            return Ok(ControlFlow::Continue(()));
        }
        if graph.users.len() >= self.config.max_list_size {
            self.mark_partial(graph, parent);
            return Ok(ControlFlow::Break(()));
        }
        let key = UserKey::fetch(user.clone(), self.profile_store.as_ref()).await?;
        graph
            .users
            .insert(key, Membership::new(parent.cloned(), user));
        Ok(ControlFlow::Continue(()))
    }

    fn mark_partial(&self, graph: &mut MembershipGraph, parent: Option<&Group>) {
        graph.partial = true;
        warn!(
            parent = %parent.map(|group| group.id.as_str()).unwrap_or_default(),
            max_list_size = self.config.max_list_size,
            groups = graph.groups.len(),
            users = graph.users.len(),
            "Large site listing truncated, consider dynamic membership rather than explicit member groups"
        );
    }
}

//! Member listing handler implementation.

use std::collections::HashSet;
use std::sync::Arc;

use sitegraph_domain::model::{AuthorizableId, ContentNode, User};
use sitegraph_domain::{EntityStore, ProfileStore, SiteService};
use tracing::{info, instrument};

use super::types::{MemberEntry, MembersError, MembersListing, MembersResult, SITE_GROUP_PREFIX};
use crate::handlers::params::MembersQuery;

/// Handler for site member listings.
pub struct MembersHandler<E: ?Sized, P: ?Sized> {
    service: Arc<SiteService<E, P>>,
    entity_store: Arc<E>,
    profile_store: Arc<P>,
}

impl<E, P> MembersHandler<E, P>
where
    E: EntityStore + ?Sized,
    P: ProfileStore + ?Sized,
{
    /// Creates a new member listing handler.
    pub fn new(
        service: Arc<SiteService<E, P>>,
        entity_store: Arc<E>,
        profile_store: Arc<P>,
    ) -> Self {
        Self {
            service,
            entity_store,
            profile_store,
        }
    }

    /// Lists one page of the site's members.
    #[instrument(skip(self, site, query), fields(site = %site.path))]
    pub async fn list(
        &self,
        site: &ContentNode,
        query: &MembersQuery,
    ) -> MembersResult<MembersListing> {
        if !self.service.is_site(site) {
            return Err(MembersError::NotASite {
                path: site.path.clone(),
            });
        }
        info!(start = query.start, items = query.items, "Finding members");

        let page = self
            .service
            .get_members(site, query.start, query.items, &query.sorts)
            .await?;
        let total = page.total();
        let partial = page.is_partial();

        let site_groups: HashSet<&AuthorizableId> = site.declared_authorizables().iter().collect();
        let mut members = Vec::with_capacity(page.len());
        for user in page {
            members.push(self.entry(user, &site_groups).await?);
        }

        Ok(MembersListing {
            site: site.path.clone(),
            total,
            partial,
            members,
        })
    }

    async fn entry(
        &self,
        user: User,
        site_groups: &HashSet<&AuthorizableId>,
    ) -> MembersResult<MemberEntry> {
        let profile = self.profile_store.profile_of(&user.id).await?;
        let groups = self.entity_store.member_of(&user).await?;

        // Site groups of other sites are hidden; other groups are kept.
        let member_groups = (!groups.is_empty()).then(|| {
            groups
                .into_iter()
                .map(|group| group.id)
                .filter(|id| {
                    !id.as_str().starts_with(SITE_GROUP_PREFIX) || site_groups.contains(id)
                })
                .map(|id| id.to_string())
                .collect()
        });

        let (first_name, last_name, email) = match profile {
            Some(p) => (p.first_name, p.last_name, p.email),
            None => (None, None, None),
        };
        Ok(MemberEntry {
            id: user.id.to_string(),
            first_name,
            last_name,
            email,
            member_groups,
        })
    }
}

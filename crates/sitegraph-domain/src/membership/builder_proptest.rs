//! Property-based tests for the membership graph builder.

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;

use super::tests::mocks::{add_person, create_builder};
use super::{AuthorizableKey, MembershipConfig, MembershipGraph};
use crate::model::{AuthorizableId, ContentNode, Group};

/// A random topology: `groups[i]` lists member indices. Indices below the
/// group count name groups, the next `users` indices name users, and
/// anything beyond is a dangling reference.
#[derive(Debug, Clone)]
struct Topology {
    groups: Vec<Vec<usize>>,
    users: usize,
    site: Vec<usize>,
}

impl Topology {
    fn name(&self, index: usize) -> String {
        let group_count = self.groups.len();
        if index < group_count {
            format!("g-{index}")
        } else if index < group_count + self.users {
            format!("u-{}", index - group_count)
        } else {
            format!("missing-{index}")
        }
    }

    /// Every id reachable from the site declarations.
    fn reachable(&self) -> HashSet<String> {
        let group_count = self.groups.len();
        let known = group_count + self.users;
        let mut seen = HashSet::new();
        let mut queue: VecDeque<usize> = self.site.iter().copied().collect();
        while let Some(index) = queue.pop_front() {
            if index >= known || !seen.insert(self.name(index)) {
                continue;
            }
            if index < group_count {
                queue.extend(self.groups[index].iter().copied());
            }
        }
        seen
    }
}

fn topology_strategy() -> impl Strategy<Value = Topology> {
    (1usize..8, 1usize..8).prop_flat_map(|(group_count, users)| {
        let universe = group_count + users + 2;
        (
            prop::collection::vec(prop::collection::vec(0..universe, 0..6), group_count),
            prop::collection::vec(0..universe, 0..6),
        )
            .prop_map(move |(groups, site)| Topology {
                groups,
                users,
                site,
            })
    })
}

fn build(topology: &Topology) -> MembershipGraph {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime.block_on(async {
        let (entities, profiles, builder) = create_builder(MembershipConfig::default());
        for user in 0..topology.users {
            let id = format!("u-{user}");
            add_person(&entities, &profiles, &id, "First", "Last").await;
        }
        for (index, members) in topology.groups.iter().enumerate() {
            let names: Vec<String> = members.iter().map(|m| topology.name(*m)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            entities.add_group(Group::new(format!("g-{index}")), &refs).await;
        }
        let declared: Vec<String> = topology.site.iter().map(|i| topology.name(*i)).collect();
        builder
            .build(&ContentNode::site("/sites/generated", declared))
            .await
            .unwrap()
    })
}

proptest! {
    #[test]
    fn test_graph_matches_reachable_set(topology in topology_strategy()) {
        let graph = build(&topology);
        let ids: Vec<String> = graph.ids().map(AuthorizableId::to_string).collect();
        let unique: HashSet<String> = ids.iter().cloned().collect();

        prop_assert_eq!(ids.len(), unique.len(), "duplicate entities in graph");
        prop_assert_eq!(unique, topology.reachable());
        prop_assert!(!graph.is_partial());
    }

    #[test]
    fn test_parents_are_expanded_groups_declaring_the_member(topology in topology_strategy()) {
        let graph = build(&topology);
        let declared_on_site: HashSet<String> =
            topology.site.iter().map(|i| topology.name(*i)).collect();

        let memberships = graph
            .groups()
            .iter()
            .map(|(k, m)| (k.id(), m))
            .chain(graph.users().iter().map(|(k, m)| (k.id(), m)));
        for (id, membership) in memberships {
            match membership.parent_id() {
                None => prop_assert!(declared_on_site.contains(id.as_str())),
                Some(parent) => {
                    prop_assert!(graph.contains_group(parent));
                    let index: usize = parent.as_str()["g-".len()..].parse().unwrap();
                    let declares = topology.groups[index]
                        .iter()
                        .any(|m| topology.name(*m) == id.as_str());
                    prop_assert!(declares, "{} does not declare {}", parent, id);
                }
            }
        }
    }
}

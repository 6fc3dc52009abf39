//! Property-based tests for the ranking engine.

use std::cmp::Ordering;

use proptest::prelude::*;

use super::{AuthorizableKey, Comparator, UserKey};
use crate::model::{Profile, Sort, SortField, SortOrder, User};

/// Small name alphabets so that ties are common.
fn user_strategy() -> impl Strategy<Value = (String, String)> {
    ("[a-c]{1,2}", "[x-z]{1,2}")
}

fn users_strategy() -> impl Strategy<Value = Vec<UserKey>> {
    prop::collection::vec(user_strategy(), 0..24).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, (first, last))| {
                let id = format!("u-{i:02}");
                UserKey::new(User::new(id.as_str()), &Profile::new(id.as_str(), first, last))
            })
            .collect()
    })
}

fn sort_strategy() -> impl Strategy<Value = Sort> {
    (
        prop_oneof![
            Just(SortField::Id),
            Just(SortField::FirstName),
            Just(SortField::LastName)
        ],
        prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)],
    )
        .prop_map(|(field, order)| Sort::new(field, order))
}

fn ids(keys: &[UserKey]) -> Vec<String> {
    keys.iter().map(|k| k.id().to_string()).collect()
}

proptest! {
    #[test]
    fn prop_sorted_output_is_ordered_permutation(
        users in users_strategy(),
        sorts in prop::collection::vec(sort_strategy(), 0..4),
    ) {
        let comparator = Comparator::new(sorts);
        let mut sorted = users.clone();
        comparator.sort(&mut sorted);

        let mut before = ids(&users);
        let mut after = ids(&sorted);
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);

        for pair in sorted.windows(2) {
            prop_assert_ne!(comparator.compare(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn prop_ties_keep_discovery_order(users in users_strategy()) {
        let mut sorted = users.clone();
        Comparator::new(vec![Sort::asc(SortField::LastName)]).sort(&mut sorted);

        // Ids were assigned in discovery order, so equal last names keep ascending ids.
        for pair in sorted.windows(2) {
            if pair[0].last_name() == pair[1].last_name() {
                prop_assert!(pair[0].id() < pair[1].id());
            }
        }
    }

    #[test]
    fn prop_id_desc_reverses_id_asc(users in users_strategy()) {
        let mut ascending = users.clone();
        Comparator::new(vec![Sort::asc(SortField::Id)]).sort(&mut ascending);
        let mut descending = users;
        Comparator::new(vec![Sort::desc(SortField::Id)]).sort(&mut descending);

        let mut reversed = ids(&ascending);
        reversed.reverse();
        prop_assert_eq!(ids(&descending), reversed);
    }
}

//! Multi-list intersection for indexed queries
//!
//! A query on several indexed fields yields one id list per field; the
//! candidates are the ids present in every list.
//!
//! ## Algorithm
//!
//! The shortest list seeds a tag map (`id -> 0`). The remaining lists are
//! then walked in order; on pass `k` an id whose tag is `k - 1` advances to
//! `k`, anything else is ignored. An id that advances on the final pass is
//! emitted and retired, so it is emitted exactly once. The result follows
//! the order of the final list.
//!
//! Cost is O(sum of list lengths) time and O(shortest list) space.

use std::collections::{HashMap, HashSet};

use docstore_core::RecordId;

/// Tag of an id that has already been emitted
const EMITTED: usize = usize::MAX;

/// Ids present in every one of `lists`
///
/// No lists yields nothing; a single list yields its ids de-duplicated in
/// first-occurrence order.
pub fn intersect<S: AsRef<[RecordId]>>(lists: &[S]) -> Vec<RecordId> {
    match lists.len() {
        0 => return Vec::new(),
        1 => {
            let mut seen = HashSet::new();
            return lists[0]
                .as_ref()
                .iter()
                .copied()
                .filter(|id| seen.insert(*id))
                .collect();
        }
        _ => {}
    }

    let shortest = lists
        .iter()
        .enumerate()
        .min_by_key(|(_, list)| list.as_ref().len())
        .map(|(i, _)| i)
        .unwrap_or(0);

    let order = std::iter::once(shortest).chain((0..lists.len()).filter(|&i| i != shortest));
    let last_pass = lists.len() - 1;

    let mut tags: HashMap<RecordId, usize> =
        HashMap::with_capacity(lists[shortest].as_ref().len());
    let mut result = Vec::new();

    for (pass, list_idx) in order.enumerate() {
        for &id in lists[list_idx].as_ref() {
            if pass == 0 {
                tags.entry(id).or_insert(0);
                continue;
            }
            if let Some(tag) = tags.get_mut(&id) {
                if *tag == pass - 1 {
                    if pass == last_pass {
                        result.push(id);
                        *tag = EMITTED;
                    } else {
                        *tag = pass;
                    }
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(raw: &[u64]) -> Vec<RecordId> {
        raw.iter().copied().map(RecordId::new).collect()
    }

    #[test]
    fn test_no_lists() {
        let lists: Vec<Vec<RecordId>> = Vec::new();
        assert!(intersect(&lists).is_empty());
    }

    #[test]
    fn test_single_list_is_deduplicated() {
        assert_eq!(intersect(&[ids(&[3, 1, 3, 2])]), ids(&[3, 1, 2]));
    }

    #[test]
    fn test_two_lists() {
        assert_eq!(intersect(&[ids(&[1, 2]), ids(&[1, 3])]), ids(&[1]));
    }

    #[test]
    fn test_disjoint_lists() {
        assert!(intersect(&[ids(&[1, 2]), ids(&[3, 4])]).is_empty());
    }

    #[test]
    fn test_empty_list_empties_result() {
        assert!(intersect(&[ids(&[1, 2]), ids(&[]), ids(&[1, 2])]).is_empty());
    }

    #[test]
    fn test_three_lists_order_follows_final_list() {
        // Shortest is the second list; final pass walks the third list.
        let result = intersect(&[ids(&[1, 2, 3, 4, 5]), ids(&[4, 2]), ids(&[5, 4, 3, 2])]);
        assert_eq!(result, ids(&[4, 2]));
    }

    #[test]
    fn test_repeat_in_final_list_emitted_once() {
        assert_eq!(intersect(&[ids(&[1]), ids(&[1, 1, 1])]), ids(&[1]));
    }

    #[test]
    fn test_id_must_be_in_every_list() {
        // 9 is in lists 0 and 2 but not 1.
        let result = intersect(&[ids(&[9, 1]), ids(&[1, 2, 3]), ids(&[1, 9])]);
        assert_eq!(result, ids(&[1]));
    }

    proptest! {
        #[test]
        fn prop_matches_set_intersection(
            lists in prop::collection::vec(
                prop::collection::vec(1u64..20, 0..15),
                1..5,
            )
        ) {
            let lists: Vec<Vec<RecordId>> = lists.iter().map(|l| ids(l)).collect();
            let result = intersect(&lists);

            let expected: HashSet<RecordId> = lists[0]
                .iter()
                .copied()
                .filter(|id| lists.iter().all(|l| l.contains(id)))
                .collect();

            let got: HashSet<RecordId> = result.iter().copied().collect();
            prop_assert_eq!(got.len(), result.len(), "duplicate ids emitted");
            prop_assert_eq!(got, expected);
        }
    }
}

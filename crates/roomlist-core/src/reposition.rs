//! Incremental repositioning of a single room after its category changed.
//!
//! Each recency list holding the room is rebuilt in one pass: the room is
//! dropped from its old slot and re-inserted at the head of its category
//! group. Everything else keeps its relative order, so a single event costs
//! O(n) per list instead of a full re-sort. Manual lists are left alone.

use tracing::trace;

use crate::types::{Category, ListEntry, RoomLists, SortDiscipline};

/// Builds the next version of one recency list while walking the previous one.
#[derive(Debug)]
pub struct RecencyListBuilder<'a> {
    room_id: &'a str,
    category: Category,
    sticky_room_id: Option<&'a str>,
    entries: Vec<ListEntry>,
    inserted: bool,
}

impl<'a> RecencyListBuilder<'a> {
    pub fn new(
        room_id: &'a str,
        category: Category,
        sticky_room_id: Option<&'a str>,
        capacity: usize,
    ) -> Self {
        Self {
            room_id,
            category,
            sticky_room_id,
            entries: Vec::with_capacity(capacity),
            inserted: false,
        }
    }

    /// Feed the next entry of the previous list.
    pub fn push(&mut self, entry: &ListEntry) {
        if self.sticky_room_id == Some(entry.room_id.as_str()) {
            self.entries.push(entry.clone());
            return;
        }
        if !self.inserted && entry.category >= self.category {
            self.entries
                .push(ListEntry::new(self.room_id, self.category));
            self.inserted = true;
        }
        if entry.room_id != self.room_id {
            self.entries.push(entry.clone());
        }
    }

    /// Finish the list. A room that crossed no boundary goes to the end.
    pub fn finish(mut self) -> Vec<ListEntry> {
        if !self.inserted {
            self.entries
                .push(ListEntry::new(self.room_id, self.category));
        }
        self.entries
    }
}

/// Move `room_id` to `category` in every recency list that already holds it.
///
/// Returns fresh lists; `lists` is left untouched. The sticky room is never
/// moved, and its entries never act as insertion boundaries.
pub fn reposition(
    lists: &RoomLists,
    room_id: &str,
    category: Category,
    sticky_room_id: Option<&str>,
) -> RoomLists {
    if sticky_room_id == Some(room_id) {
        return lists.clone();
    }

    lists
        .iter()
        .map(|(key, entries)| {
            let holds_room = entries.iter().any(|entry| entry.room_id == room_id);
            if key.discipline() != SortDiscipline::Recency || !holds_room {
                return (key.clone(), entries.clone());
            }

            let mut builder =
                RecencyListBuilder::new(room_id, category, sticky_room_id, entries.len());
            for entry in entries {
                builder.push(entry);
            }
            trace!(list = %key, %room_id, ?category, "repositioned room");
            (key.clone(), builder.finish())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListKey;
    use proptest::prelude::*;

    fn entries(rows: &[(&str, Category)]) -> Vec<ListEntry> {
        rows.iter()
            .map(|(id, category)| ListEntry::new(*id, *category))
            .collect()
    }

    fn ids(list: &[ListEntry]) -> Vec<&str> {
        list.iter().map(|entry| entry.room_id.as_str()).collect()
    }

    fn lists_with(key: ListKey, list: Vec<ListEntry>) -> RoomLists {
        let mut lists = RoomLists::new();
        lists.insert(key, list);
        lists
    }

    #[test]
    fn moves_room_to_head_of_new_category() {
        let lists = lists_with(
            ListKey::Recent,
            entries(&[
                ("a", Category::Red),
                ("b", Category::Grey),
                ("c", Category::Idle),
                ("x", Category::Idle),
            ]),
        );

        let next = reposition(&lists, "x", Category::Grey, None);
        assert_eq!(ids(&next[&ListKey::Recent]), vec!["a", "x", "b", "c"]);
        assert_eq!(next[&ListKey::Recent][1].category, Category::Grey);
        assert_eq!(ids(&lists[&ListKey::Recent]), vec!["a", "b", "c", "x"]);
    }

    #[test]
    fn room_leading_its_group_stays_put() {
        let lists = lists_with(
            ListKey::Recent,
            entries(&[("a", Category::Red), ("x", Category::Idle), ("b", Category::Idle)]),
        );

        let next = reposition(&lists, "x", Category::Idle, None);
        assert_eq!(next, lists);
    }

    #[test]
    fn reposition_is_idempotent() {
        let lists = lists_with(
            ListKey::Recent,
            entries(&[("a", Category::Bold), ("b", Category::Idle), ("x", Category::Idle)]),
        );

        let once = reposition(&lists, "x", Category::Idle, None);
        let twice = reposition(&once, "x", Category::Idle, None);
        assert_eq!(once, twice);
        assert_eq!(ids(&once[&ListKey::Recent]), vec!["a", "x", "b"]);
    }

    #[test]
    fn demoted_room_without_boundary_goes_to_end() {
        let lists = lists_with(
            ListKey::Recent,
            entries(&[("x", Category::Red), ("a", Category::Red), ("b", Category::Grey)]),
        );

        let next = reposition(&lists, "x", Category::Idle, None);
        assert_eq!(ids(&next[&ListKey::Recent]), vec!["a", "b", "x"]);
        assert_eq!(next[&ListKey::Recent][2].category, Category::Idle);
    }

    #[test]
    fn lists_without_room_are_not_extended() {
        let mut lists = lists_with(ListKey::Recent, entries(&[("a", Category::Idle)]));
        lists.insert(ListKey::Direct, entries(&[("x", Category::Idle)]));

        let next = reposition(&lists, "x", Category::Red, None);
        assert_eq!(ids(&next[&ListKey::Recent]), vec!["a"]);
        assert_eq!(ids(&next[&ListKey::Direct]), vec!["x"]);
        assert_eq!(next[&ListKey::Direct][0].category, Category::Red);
    }

    #[test]
    fn manual_lists_are_untouched() {
        let lists = lists_with(
            ListKey::Favourites,
            entries(&[("a", Category::Red), ("x", Category::Red)]),
        );

        let next = reposition(&lists, "x", Category::Red, None);
        assert_eq!(ids(&next[&ListKey::Favourites]), vec!["a", "x"]);
    }

    #[test]
    fn sticky_entries_pass_through_and_are_not_boundaries() {
        let lists = lists_with(
            ListKey::Recent,
            entries(&[("s", Category::Idle), ("a", Category::Red), ("x", Category::Idle)]),
        );

        let next = reposition(&lists, "x", Category::Grey, Some("s"));
        assert_eq!(ids(&next[&ListKey::Recent]), vec!["s", "a", "x"]);
    }

    #[test]
    fn sticky_room_itself_is_frozen() {
        let lists = lists_with(
            ListKey::Recent,
            entries(&[("a", Category::Red), ("s", Category::Idle)]),
        );
        let next = reposition(&lists, "s", Category::Red, Some("s"));
        assert_eq!(next, lists);
    }

    fn category_strategy() -> impl Strategy<Value = Category> {
        prop_oneof![
            Just(Category::Red),
            Just(Category::Grey),
            Just(Category::Bold),
            Just(Category::Idle),
        ]
    }

    proptest! {
        #[test]
        fn repositions_keep_categories_sorted_and_rooms_unique(
            mut initial in proptest::collection::vec(category_strategy(), 1..12),
            moves in proptest::collection::vec((0usize..12, category_strategy()), 0..24),
        ) {
            initial.sort();
            let list: Vec<ListEntry> = initial
                .iter()
                .enumerate()
                .map(|(idx, category)| ListEntry::new(format!("!{idx}:example.org"), *category))
                .collect();
            let room_count = list.len();
            let mut lists = lists_with(ListKey::Recent, list);

            for (idx, category) in moves {
                let room_id = format!("!{}:example.org", idx % room_count);
                lists = reposition(&lists, &room_id, category, None);
            }

            let list = &lists[&ListKey::Recent];
            prop_assert_eq!(list.len(), room_count);
            prop_assert!(list.windows(2).all(|pair| pair[0].category <= pair[1].category));
            let mut seen: Vec<_> = list.iter().map(|entry| entry.room_id.clone()).collect();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), room_count);
        }
    }
}

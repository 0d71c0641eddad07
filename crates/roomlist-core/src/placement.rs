//! Moving a room between lists when its membership or classification changed.

use std::cmp::Ordering;

use tracing::trace;

use crate::{
    comparator::{ListComparator, RecencyComparator},
    source::RoomSource,
    types::{Category, ListEntry, ListKey, Room, RoomLists},
};

/// Lists currently holding `room_id`.
pub fn lists_containing(lists: &RoomLists, room_id: &str) -> Vec<ListKey> {
    lists
        .iter()
        .filter(|(_, entries)| entries.iter().any(|entry| entry.room_id == room_id))
        .map(|(key, _)| key.clone())
        .collect()
}

/// Remove `room` from every list not named in `placements` and insert it into
/// each named list at the position its comparator dictates.
///
/// Neighbours are resolved through `rooms`; entries that no longer resolve and
/// the sticky room's entries are skipped when looking for the insertion point.
pub fn relocate(
    lists: &RoomLists,
    room: &Room,
    placements: &[(ListKey, Category)],
    rooms: &dyn RoomSource,
    recency: &RecencyComparator<'_>,
    sticky_room_id: Option<&str>,
) -> RoomLists {
    let mut next: RoomLists = lists
        .iter()
        .map(|(key, entries)| {
            let kept = entries
                .iter()
                .filter(|entry| entry.room_id != room.room_id)
                .cloned()
                .collect();
            (key.clone(), kept)
        })
        .collect();

    for (key, category) in placements {
        let comparator =
            ListComparator::for_discipline(key.discipline(), *recency, key.tag_name(), None);
        let entries = next.entry(key.clone()).or_default();
        let index = insertion_index(entries, room, *category, &comparator, rooms, sticky_room_id);
        trace!(list = %key, room_id = %room.room_id, index, "placed room");
        entries.insert(index, ListEntry::new(room.room_id.clone(), *category));
    }

    next
}

fn insertion_index(
    entries: &[ListEntry],
    room: &Room,
    category: Category,
    comparator: &ListComparator<'_>,
    rooms: &dyn RoomSource,
    sticky_room_id: Option<&str>,
) -> usize {
    entries
        .iter()
        .position(|entry| {
            if sticky_room_id == Some(entry.room_id.as_str()) {
                return false;
            }
            let Some(other) = rooms.room(&entry.room_id) else {
                return false;
            };
            comparator.compare((room, category), (other.as_ref(), entry.category)) == Ordering::Less
        })
        .unwrap_or(entries.len())
}

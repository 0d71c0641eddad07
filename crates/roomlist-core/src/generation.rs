//! Full list generation, run once the connection is prepared.

use std::{collections::BTreeMap, sync::Arc};

use tracing::debug;

use crate::{
    category::room_category,
    comparator::{ManualComparator, RecencyComparator},
    source::DirectRoomLookup,
    types::{
        Category, ListEntry, ListKey, ManualOrderOverride, Membership, Room, RoomLists,
        SortDiscipline,
    },
    unread::UnreadPolicy,
};

/// Decides which lists a room belongs to and under which category.
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    pub unread: &'a dyn UnreadPolicy,
    pub direct_rooms: &'a dyn DirectRoomLookup,
    /// Whether custom tag lists are enabled.
    pub custom_tags: bool,
    /// When `false`, computed categories collapse to IDLE.
    pub order_by_importance: bool,
}

impl<'a> Classifier<'a> {
    /// Computed category, honoring `order_by_importance`.
    pub fn category(&self, room: &Room) -> Category {
        if self.order_by_importance {
            room_category(room, self.unread)
        } else {
            Category::Idle
        }
    }

    /// Category used when the room's position is refreshed after an event.
    /// Invites stay maximally urgent.
    pub fn update_category(&self, room: &Room) -> Category {
        if room.membership == Membership::Invite {
            Category::Red
        } else {
            self.category(room)
        }
    }

    /// Lists `room` belongs to, each with the category it is filed under.
    /// Empty for memberships that are not shown.
    pub fn placements(&self, room: &Room) -> Vec<(ListKey, Category)> {
        match room.membership {
            Membership::Invite => vec![(ListKey::Invites, Category::Red)],
            Membership::Join | Membership::Ban => self.joined_placements(room),
            Membership::Leave if room.kicked => self.joined_placements(room),
            Membership::Leave => vec![(ListKey::Archived, self.category(room))],
            Membership::Knock => Vec::new(),
        }
    }

    fn joined_placements(&self, room: &Room) -> Vec<(ListKey, Category)> {
        let tagged: Vec<_> = room
            .tags
            .keys()
            .filter_map(|tag| ListKey::from_tag(tag, self.custom_tags))
            .map(|key| (key, Category::Red))
            .collect();
        if !tagged.is_empty() {
            return tagged;
        }

        let key = if self.direct_rooms.user_id_for_room(&room.room_id).is_some() {
            ListKey::Direct
        } else {
            ListKey::Recent
        };
        vec![(key, self.category(room))]
    }
}

/// Bucket every room and sort each list once with its discipline's comparator.
///
/// `pending` is an optimistic manual order applied to manual lists only.
pub fn generate_initial_lists(
    rooms: &[Arc<Room>],
    classifier: &Classifier<'_>,
    recency: &RecencyComparator<'_>,
    pending: Option<&ManualOrderOverride>,
) -> RoomLists {
    let mut buckets: BTreeMap<ListKey, Vec<(&Room, Category)>> = ListKey::FIXED
        .iter()
        .cloned()
        .map(|key| (key, Vec::new()))
        .collect();

    for room in rooms {
        for (key, category) in classifier.placements(room) {
            buckets.entry(key).or_default().push((room.as_ref(), category));
        }
    }

    buckets
        .into_iter()
        .map(|(key, mut members)| {
            match key.discipline() {
                SortDiscipline::Recency => {
                    members.sort_by_cached_key(|(room, category)| recency.key(room, *category));
                }
                SortDiscipline::Manual => {
                    let manual = ManualComparator::new(key.tag_name(), pending);
                    members.sort_by(|a, b| manual.compare(a.0, b.0));
                }
            }
            debug!(list = %key, room_count = members.len(), "generated room list");
            let entries = members
                .into_iter()
                .map(|(room, category)| ListEntry::new(room.room_id.clone(), category))
                .collect();
            (key, entries)
        })
        .collect()
}

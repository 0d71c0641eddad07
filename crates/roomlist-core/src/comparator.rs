//! Orderings for the two list disciplines.

use std::cmp::{Ordering, Reverse};

use crate::{
    types::{Category, ManualOrderOverride, Room, SortDiscipline, TimelineEvent},
    unread::UnreadPolicy,
};

/// Sort key of a room in a recency list: category rank, then newest activity
/// descending, rooms without any timestamp last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecencyKey {
    category: Category,
    newest_activity: Reverse<Option<u64>>,
}

impl RecencyKey {
    pub fn new(category: Category, newest_activity_ms: Option<u64>) -> Self {
        Self {
            category,
            newest_activity: Reverse(newest_activity_ms),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn newest_activity_ms(&self) -> Option<u64> {
        self.newest_activity.0
    }
}

/// Orders rooms by category, then by the timestamp of their newest
/// activity-triggering event.
#[derive(Clone, Copy)]
pub struct RecencyComparator<'a> {
    unread: &'a dyn UnreadPolicy,
    own_user_id: &'a str,
}

impl<'a> RecencyComparator<'a> {
    pub fn new(unread: &'a dyn UnreadPolicy, own_user_id: &'a str) -> Self {
        Self {
            unread,
            own_user_id,
        }
    }

    /// Whether `event` should move its room in recency lists: it carries a
    /// timestamp and either counts as unread or was sent by the local user.
    pub fn triggers_reorder(&self, event: &TimelineEvent) -> bool {
        event.timestamp().is_some()
            && (self.unread.event_triggers_unread_count(event) || event.sender == self.own_user_id)
    }

    /// Timestamp of the newest activity-triggering event, falling back to the
    /// oldest timeline event. `None` sorts last.
    pub fn newest_activity_ms(&self, room: &Room) -> Option<u64> {
        room.timeline
            .iter()
            .rev()
            .find(|event| self.triggers_reorder(event))
            .and_then(TimelineEvent::timestamp)
            .or_else(|| room.timeline.first().and_then(TimelineEvent::timestamp))
    }

    pub fn key(&self, room: &Room, category: Category) -> RecencyKey {
        RecencyKey::new(category, self.newest_activity_ms(room))
    }

    pub fn compare(&self, a: (&Room, Category), b: (&Room, Category)) -> Ordering {
        if a.1 != b.1 {
            return a.1.cmp(&b.1);
        }
        self.key(a.0, a.1).cmp(&self.key(b.0, b.1))
    }
}

/// Orders rooms by the numeric `order` of one tag, undefined orders last,
/// ties broken by display name.
#[derive(Debug, Clone, Copy)]
pub struct ManualComparator<'a> {
    tag_name: Option<&'a str>,
    pending: Option<&'a ManualOrderOverride>,
}

impl<'a> ManualComparator<'a> {
    /// Comparator for the list backed by `tag_name`. `pending` replaces the
    /// stored order of the room it targets while a tag request is in flight.
    pub fn new(tag_name: Option<&'a str>, pending: Option<&'a ManualOrderOverride>) -> Self {
        Self { tag_name, pending }
    }

    pub fn order_of(&self, room: &Room) -> Option<f64> {
        let tag_name = self.tag_name?;
        match self.pending {
            Some(pending) if pending.room_id == room.room_id && pending.tag_name == tag_name => {
                pending.order.filter(|order| order.is_finite())
            }
            _ => room.tag_order(tag_name),
        }
    }

    pub fn compare(&self, a: &Room, b: &Room) -> Ordering {
        let by_order = match (self.order_of(a), self.order_of(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_order.then_with(|| a.display_name().cmp(b.display_name()))
    }
}

/// Comparator matching a list's discipline.
#[derive(Clone, Copy)]
pub enum ListComparator<'a> {
    Recency(RecencyComparator<'a>),
    Manual(ManualComparator<'a>),
}

impl<'a> ListComparator<'a> {
    pub fn for_discipline(
        discipline: SortDiscipline,
        recency: RecencyComparator<'a>,
        tag_name: Option<&'a str>,
        pending: Option<&'a ManualOrderOverride>,
    ) -> Self {
        match discipline {
            SortDiscipline::Recency => Self::Recency(recency),
            SortDiscipline::Manual => Self::Manual(ManualComparator::new(tag_name, pending)),
        }
    }

    pub fn compare(&self, a: (&Room, Category), b: (&Room, Category)) -> Ordering {
        match self {
            Self::Recency(cmp) => cmp.compare(a, b),
            Self::Manual(cmp) => cmp.compare(a.0, b.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        types::{Membership, TAG_FAVOURITE, TagInfo},
        unread::DefaultUnreadPolicy,
    };

    const ME: &str = "@alice:example.org";

    fn event(sender: &str, event_type: &str, ts: Option<u64>) -> TimelineEvent {
        TimelineEvent {
            event_id: None,
            event_type: event_type.to_owned(),
            sender: sender.to_owned(),
            timestamp_ms: ts,
            redacted: false,
            is_replacement: false,
        }
    }

    fn room(room_id: &str, name: &str, timeline: Vec<TimelineEvent>) -> Room {
        let mut room = Room::new(room_id, Membership::Join);
        room.name = Some(name.to_owned());
        room.timeline = timeline;
        room
    }

    fn favourite(room_id: &str, name: &str, order: Option<serde_json::Value>) -> Room {
        let mut room = room(room_id, name, Vec::new());
        room.tags
            .insert(TAG_FAVOURITE.to_owned(), TagInfo { order });
        room
    }

    #[test]
    fn newest_activity_skips_non_triggering_events() {
        let policy = DefaultUnreadPolicy::new(ME);
        let cmp = RecencyComparator::new(&policy, ME);
        let room = room(
            "!r:example.org",
            "R",
            vec![
                event("@bob:example.org", "m.room.message", Some(100)),
                event("@bob:example.org", "m.room.member", Some(300)),
            ],
        );
        assert_eq!(cmp.newest_activity_ms(&room), Some(100));
    }

    #[test]
    fn own_events_trigger_reorder() {
        let policy = DefaultUnreadPolicy::new(ME);
        let cmp = RecencyComparator::new(&policy, ME);
        let room = room(
            "!r:example.org",
            "R",
            vec![
                event("@bob:example.org", "m.room.message", Some(100)),
                event(ME, "m.room.message", Some(250)),
            ],
        );
        assert_eq!(cmp.newest_activity_ms(&room), Some(250));
        assert!(!cmp.triggers_reorder(&event(ME, "m.room.message", None)));
    }

    #[test]
    fn falls_back_to_oldest_event_then_to_infinitely_old() {
        let policy = DefaultUnreadPolicy::new(ME);
        let cmp = RecencyComparator::new(&policy, ME);
        let only_state = room(
            "!a:example.org",
            "A",
            vec![
                event("@bob:example.org", "m.room.member", Some(40)),
                event("@bob:example.org", "m.room.member", Some(90)),
            ],
        );
        let empty = room("!b:example.org", "B", Vec::new());

        assert_eq!(cmp.newest_activity_ms(&only_state), Some(40));
        assert_eq!(cmp.newest_activity_ms(&empty), None);
        assert_eq!(
            cmp.compare((&only_state, Category::Idle), (&empty, Category::Idle)),
            Ordering::Less
        );
    }

    #[test]
    fn recency_orders_category_before_time() {
        let policy = DefaultUnreadPolicy::new(ME);
        let cmp = RecencyComparator::new(&policy, ME);
        let old = room(
            "!old:example.org",
            "Old",
            vec![event("@bob:example.org", "m.room.message", Some(10))],
        );
        let new = room(
            "!new:example.org",
            "New",
            vec![event("@bob:example.org", "m.room.message", Some(20))],
        );

        assert_eq!(
            cmp.compare((&old, Category::Red), (&new, Category::Grey)),
            Ordering::Less
        );
        assert_eq!(
            cmp.compare((&old, Category::Idle), (&new, Category::Idle)),
            Ordering::Greater
        );
    }

    #[test]
    fn ordered_favourite_sorts_before_unordered_regardless_of_name() {
        let y = favourite("!y:example.org", "Zulu", Some(serde_json::json!("1.5")));
        let z = favourite("!z:example.org", "Alpha", None);
        let cmp = ManualComparator::new(Some(TAG_FAVOURITE), None);

        assert_eq!(cmp.compare(&y, &z), Ordering::Less);
        assert_eq!(cmp.compare(&z, &y), Ordering::Greater);
    }

    #[test]
    fn manual_ties_break_on_case_sensitive_name() {
        let a = favourite("!a:example.org", "beta", Some(serde_json::json!(0.5)));
        let b = favourite("!b:example.org", "Beta", Some(serde_json::json!(0.5)));
        let cmp = ManualComparator::new(Some(TAG_FAVOURITE), None);
        assert_eq!(cmp.compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn malformed_order_sorts_last() {
        let good = favourite("!g:example.org", "Zed", Some(serde_json::json!(0.9)));
        let bad = favourite("!b:example.org", "Abe", Some(serde_json::json!({"x": 1})));
        let cmp = ManualComparator::new(Some(TAG_FAVOURITE), None);
        assert_eq!(cmp.compare(&good, &bad), Ordering::Less);
    }

    #[test]
    fn pending_override_replaces_stored_order() {
        let a = favourite("!a:example.org", "A", Some(serde_json::json!(0.1)));
        let b = favourite("!b:example.org", "B", Some(serde_json::json!(0.2)));
        let pending = ManualOrderOverride {
            room_id: "!b:example.org".to_owned(),
            tag_name: TAG_FAVOURITE.to_owned(),
            order: Some(0.05),
        };

        let confirmed = ManualComparator::new(Some(TAG_FAVOURITE), None);
        let optimistic = ManualComparator::new(Some(TAG_FAVOURITE), Some(&pending));
        assert_eq!(confirmed.compare(&a, &b), Ordering::Less);
        assert_eq!(optimistic.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn list_comparator_dispatches_on_discipline() {
        let policy = DefaultUnreadPolicy::new(ME);
        let recency = RecencyComparator::new(&policy, ME);
        let a = favourite("!a:example.org", "A", Some(serde_json::json!(2)));
        let b = favourite("!b:example.org", "B", Some(serde_json::json!(1)));

        let manual =
            ListComparator::for_discipline(SortDiscipline::Manual, recency, Some(TAG_FAVOURITE), None);
        assert_eq!(
            manual.compare((&a, Category::Red), (&b, Category::Idle)),
            Ordering::Greater
        );

        let by_recency =
            ListComparator::for_discipline(SortDiscipline::Recency, recency, None, None);
        assert_eq!(
            by_recency.compare((&a, Category::Red), (&b, Category::Idle)),
            Ordering::Less
        );
    }
}

//! Unread predicates used by the category calculator and recency ordering.

use crate::types::{Room, TimelineEvent};

/// Event types that never bump unread counters.
const NON_NOTIFYING_EVENT_TYPES: &[&str] = &[
    "m.room.member",
    "m.room.third_party_invite",
    "m.call.answer",
    "m.call.hangup",
    "m.room.canonical_alias",
    "m.room.aliases",
    "m.room.server_acl",
];

/// Decides which events count as unread.
pub trait UnreadPolicy: Send + Sync {
    /// Whether `event` would increment the room's unread counter.
    fn event_triggers_unread_count(&self, event: &TimelineEvent) -> bool;

    /// Whether `room` has any unread messages.
    fn room_has_unread_messages(&self, room: &Room) -> bool;
}

/// Unread rules for a single local user.
#[derive(Debug, Clone)]
pub struct DefaultUnreadPolicy {
    own_user_id: String,
}

impl DefaultUnreadPolicy {
    pub fn new(own_user_id: impl Into<String>) -> Self {
        Self {
            own_user_id: own_user_id.into(),
        }
    }

    pub fn own_user_id(&self) -> &str {
        &self.own_user_id
    }
}

impl UnreadPolicy for DefaultUnreadPolicy {
    fn event_triggers_unread_count(&self, event: &TimelineEvent) -> bool {
        if event.sender == self.own_user_id || event.is_replacement || event.redacted {
            return false;
        }
        !NON_NOTIFYING_EVENT_TYPES.contains(&event.event_type.as_str())
    }

    /// Scans newest to oldest. The read marker and the local user's own
    /// messages both end the scan.
    fn room_has_unread_messages(&self, room: &Room) -> bool {
        for event in room.timeline.iter().rev() {
            if let (Some(read_up_to), Some(event_id)) =
                (room.read_up_to_event_id.as_deref(), event.event_id.as_deref())
                && read_up_to == event_id
            {
                return false;
            }
            if event.sender == self.own_user_id {
                return false;
            }
            if self.event_triggers_unread_count(event) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Membership;

    const ME: &str = "@alice:example.org";

    fn event(event_id: &str, event_type: &str, sender: &str) -> TimelineEvent {
        TimelineEvent {
            event_id: Some(event_id.to_owned()),
            event_type: event_type.to_owned(),
            sender: sender.to_owned(),
            timestamp_ms: Some(1_700_000_000_000),
            redacted: false,
            is_replacement: false,
        }
    }

    #[test]
    fn own_and_membership_events_do_not_count() {
        let policy = DefaultUnreadPolicy::new(ME);
        assert!(!policy.event_triggers_unread_count(&event("$1", "m.room.message", ME)));
        assert!(!policy.event_triggers_unread_count(&event(
            "$2",
            "m.room.member",
            "@bob:example.org"
        )));
        assert!(policy.event_triggers_unread_count(&event(
            "$3",
            "m.room.message",
            "@bob:example.org"
        )));
    }

    #[test]
    fn edits_and_redactions_do_not_count() {
        let policy = DefaultUnreadPolicy::new(ME);
        let mut edit = event("$1", "m.room.message", "@bob:example.org");
        edit.is_replacement = true;
        let mut redacted = event("$2", "m.room.message", "@bob:example.org");
        redacted.redacted = true;

        assert!(!policy.event_triggers_unread_count(&edit));
        assert!(!policy.event_triggers_unread_count(&redacted));
    }

    #[test]
    fn read_marker_stops_unread_scan() {
        let policy = DefaultUnreadPolicy::new(ME);
        let mut room = Room::new("!r:example.org", Membership::Join);
        room.timeline = vec![
            event("$1", "m.room.message", "@bob:example.org"),
            event("$2", "m.room.message", ME),
        ];
        room.read_up_to_event_id = Some("$1".to_owned());
        assert!(!policy.room_has_unread_messages(&room));

        room.timeline
            .push(event("$3", "m.room.message", "@bob:example.org"));
        assert!(policy.room_has_unread_messages(&room));
    }

    #[test]
    fn own_reply_marks_earlier_messages_read() {
        let policy = DefaultUnreadPolicy::new(ME);
        let mut room = Room::new("!r:example.org", Membership::Join);
        room.timeline = vec![
            event("$1", "m.room.message", "@bob:example.org"),
            event("$2", "m.room.message", ME),
        ];
        assert!(!policy.room_has_unread_messages(&room));

        room.timeline
            .push(event("$3", "m.room.member", "@carol:example.org"));
        assert!(!policy.room_has_unread_messages(&room));

        room.timeline
            .push(event("$4", "m.room.message", "@carol:example.org"));
        assert!(policy.room_has_unread_messages(&room));
    }

    #[test]
    fn missing_read_marker_counts_any_foreign_message() {
        let policy = DefaultUnreadPolicy::new(ME);
        let mut room = Room::new("!r:example.org", Membership::Join);
        assert!(!policy.room_has_unread_messages(&room));

        room.timeline
            .push(event("$1", "m.room.message", "@bob:example.org"));
        assert!(policy.room_has_unread_messages(&room));
    }
}

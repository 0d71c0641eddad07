use serde::{Deserialize, Serialize};

use crate::types::TimelineEvent;

/// Sync connection state reported by the protocol client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Initial sync finished; room data is resident.
    Prepared,
    /// Incremental sync running.
    Syncing,
    /// Catching up after a reconnect.
    Catchup,
    /// Sync failing, retrying.
    Reconnecting,
    /// Sync failed.
    Error,
    /// Sync stopped by the client.
    Stopped,
}

/// Events consumed by the room list organizer, in strict arrival order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrganizerEvent {
    /// Sync connection changed state.
    ConnectionStateChanged {
        /// Previous state, when the client reports one.
        previous: Option<ConnectionState>,
        state: ConnectionState,
    },
    /// A room's tags changed on the server.
    RoomTagChanged { room_id: String },
    /// An event was added to a room timeline.
    TimelineEventAppended {
        room_id: String,
        event: TimelineEvent,
        /// Whether the event arrived live (not via back-pagination).
        is_live: bool,
    },
    /// An encrypted event was decrypted.
    EventDecrypted {
        /// Absent for to-device events.
        room_id: Option<String>,
        event: TimelineEvent,
        /// Whether the event sits in the room's live timeline.
        in_live_timeline: bool,
    },
    /// Account data of the given type changed (e.g. `m.direct`).
    AccountDataChanged { event_type: String },
    /// The local user's membership in a room changed.
    RoomMembershipChanged { room_id: String },
    /// The client learned about a new room.
    RoomAdded { room_id: String },
    /// A tag request was sent and awaits confirmation.
    TagActionOptimistic {
        room_id: String,
        tag_name: String,
        pending_order: Option<f64>,
    },
    /// A pending tag request failed.
    TagActionFailed { room_id: String, tag_name: String },
    /// The session ended; all state is dropped.
    Disconnected,
    /// The user opened a room; `None` when no room is in view.
    ViewRoom { room_id: Option<String> },
    /// Any other dispatched event. Ignored.
    Other { name: String },
}

impl OrganizerEvent {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionStateChanged { .. } => "connection_state_changed",
            Self::RoomTagChanged { .. } => "room_tag_changed",
            Self::TimelineEventAppended { .. } => "timeline_event_appended",
            Self::EventDecrypted { .. } => "event_decrypted",
            Self::AccountDataChanged { .. } => "account_data_changed",
            Self::RoomMembershipChanged { .. } => "room_membership_changed",
            Self::RoomAdded { .. } => "room_added",
            Self::TagActionOptimistic { .. } => "tag_action_optimistic",
            Self::TagActionFailed { .. } => "tag_action_failed",
            Self::Disconnected => "disconnected",
            Self::ViewRoom { .. } => "view_room",
            Self::Other { .. } => "other",
        }
    }
}

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Tag name for favourite rooms.
pub const TAG_FAVOURITE: &str = "m.favourite";
/// Tag name for low-priority rooms.
pub const TAG_LOW_PRIORITY: &str = "m.lowpriority";
/// Tag name for server notice rooms.
pub const TAG_SERVER_NOTICE: &str = "m.server_notice";

/// Local user's membership in a room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    /// Invited but not yet joined.
    Invite,
    /// Joined.
    Join,
    /// Left (or was removed from) the room.
    Leave,
    /// Banned from the room.
    Ban,
    /// Requested to join.
    Knock,
}

/// Metadata attached to a room tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TagInfo {
    /// Raw `order` field. Kept as JSON because clients write numbers and strings alike.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<serde_json::Value>,
}

impl TagInfo {
    /// Tag without order metadata.
    pub fn unordered() -> Self {
        Self::default()
    }

    /// Tag with a numeric order.
    pub fn with_order(order: f64) -> Self {
        Self {
            order: Some(serde_json::Value::from(order)),
        }
    }

    /// Numeric order, when the metadata holds a finite number or numeric string.
    pub fn numeric_order(&self) -> Option<f64> {
        let value = match self.order.as_ref()? {
            serde_json::Value::Number(number) => number.as_f64(),
            serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }
}

/// One event of a room timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineEvent {
    /// Event ID when available.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Matrix event type, for example `m.room.message`.
    pub event_type: String,
    /// Sender user ID.
    pub sender: String,
    /// Origin server timestamp in milliseconds since Unix epoch.
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
    /// Whether the event content was redacted.
    #[serde(default)]
    pub redacted: bool,
    /// Whether the event replaces (edits) an earlier event.
    #[serde(default)]
    pub is_replacement: bool,
}

impl TimelineEvent {
    /// Timestamp, treating a zero value as absent.
    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp_ms.filter(|ts| *ts > 0)
    }
}

/// Client-side view of a room as exposed by the protocol client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    /// Matrix room ID.
    pub room_id: String,
    /// Best-effort display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Local user's membership.
    pub membership: Membership,
    /// Whether the local user was kicked (membership `leave` set by someone else).
    #[serde(default)]
    pub kicked: bool,
    /// Room tags keyed by tag name.
    #[serde(default)]
    pub tags: BTreeMap<String, TagInfo>,
    /// Notification count reported by sync.
    #[serde(default)]
    pub unread_notifications: u64,
    /// Highlight/mention count reported by sync.
    #[serde(default)]
    pub highlight_count: u64,
    /// Event ID the local user has read up to.
    #[serde(default)]
    pub read_up_to_event_id: Option<String>,
    /// Live timeline, oldest first.
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
}

impl Room {
    /// Create an untagged room with an empty timeline.
    pub fn new(room_id: impl Into<String>, membership: Membership) -> Self {
        Self {
            room_id: room_id.into(),
            name: None,
            membership,
            kicked: false,
            tags: BTreeMap::new(),
            unread_notifications: 0,
            highlight_count: 0,
            read_up_to_event_id: None,
            timeline: Vec::new(),
        }
    }

    /// Room name when non-blank, otherwise the room ID.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.room_id)
    }

    /// Numeric manual order stored on `tag_name`, when present and well-formed.
    pub fn tag_order(&self, tag_name: &str) -> Option<f64> {
        self.tags.get(tag_name).and_then(TagInfo::numeric_order)
    }
}

/// Urgency category of a room, most urgent first.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Unread highlight (mention).
    Red,
    /// Unread notification.
    Grey,
    /// Unread messages without notifications.
    Bold,
    /// Nothing unread.
    Idle,
}

/// How entries of a list are ordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortDiscipline {
    /// User-assigned numeric tag order.
    Manual,
    /// Category first, then newest activity.
    Recency,
}

/// Identifier of a room list bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKey {
    Invites,
    Favourites,
    Direct,
    Recent,
    LowPriority,
    ServerNotices,
    Archived,
    /// User-defined tag (requires the custom tags feature).
    Custom(String),
}

impl ListKey {
    /// Lists that always exist once generation has run.
    pub const FIXED: [ListKey; 7] = [
        ListKey::Invites,
        ListKey::Favourites,
        ListKey::Direct,
        ListKey::Recent,
        ListKey::LowPriority,
        ListKey::ServerNotices,
        ListKey::Archived,
    ];

    /// Map a room tag name to a list key. Returns `None` for custom tags when
    /// `custom_tags` is disabled.
    pub fn from_tag(tag_name: &str, custom_tags: bool) -> Option<Self> {
        match tag_name {
            TAG_FAVOURITE => Some(Self::Favourites),
            TAG_LOW_PRIORITY => Some(Self::LowPriority),
            TAG_SERVER_NOTICE => Some(Self::ServerNotices),
            other if custom_tags => Some(Self::Custom(other.to_owned())),
            _ => None,
        }
    }

    /// Room tag backing this list, if it is tag-driven.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::Favourites => Some(TAG_FAVOURITE),
            Self::LowPriority => Some(TAG_LOW_PRIORITY),
            Self::ServerNotices => Some(TAG_SERVER_NOTICE),
            Self::Custom(name) => Some(name),
            Self::Invites | Self::Direct | Self::Recent | Self::Archived => None,
        }
    }

    pub fn discipline(&self) -> SortDiscipline {
        match self {
            Self::Favourites | Self::ServerNotices | Self::Custom(_) => SortDiscipline::Manual,
            Self::Invites | Self::Direct | Self::Recent | Self::LowPriority | Self::Archived => {
                SortDiscipline::Recency
            }
        }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invites => f.write_str("invites"),
            Self::Favourites => f.write_str("favourites"),
            Self::Direct => f.write_str("direct"),
            Self::Recent => f.write_str("recent"),
            Self::LowPriority => f.write_str("low-priority"),
            Self::ServerNotices => f.write_str("server-notices"),
            Self::Archived => f.write_str("archived"),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

/// A room's position in one list together with the category it was placed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub room_id: String,
    pub category: Category,
}

impl ListEntry {
    pub fn new(room_id: impl Into<String>, category: Category) -> Self {
        Self {
            room_id: room_id.into(),
            category,
        }
    }
}

/// All lists keyed by list key.
pub type RoomLists = BTreeMap<ListKey, Vec<ListEntry>>;

/// Read-only projection handed to consumers: room IDs per list, in display order.
pub type RoomListSnapshot = BTreeMap<ListKey, Vec<String>>;

/// Payload-free change notification. Consumers re-read the snapshot on receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListsChanged;

/// Optimistic, not yet confirmed manual order for one room in one tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualOrderOverride {
    pub room_id: String,
    /// Tag the pending order applies to.
    pub tag_name: String,
    /// Pending order value; `None` means the pending request clears the order.
    pub order: Option<f64>,
}

/// Organizer tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizerConfig {
    /// Local user ID; self-sent events always count as activity.
    pub own_user_id: String,
    /// When `false`, every computed category is IDLE.
    pub order_by_importance: bool,
    /// Capacity of the change notification channel.
    pub change_buffer: usize,
    /// Capacity of the runtime event feed.
    pub feed_buffer: usize,
}

impl OrganizerConfig {
    pub fn new(own_user_id: impl Into<String>) -> Self {
        Self {
            own_user_id: own_user_id.into(),
            order_by_importance: true,
            change_buffer: 64,
            feed_buffer: 256,
        }
    }
}

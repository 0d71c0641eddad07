//! Client-side room list categorization and ordering.
//!
//! This crate buckets rooms into named lists, assigns each room an urgency
//! category, and keeps every list ordered as events arrive, repositioning a
//! single room at a time instead of re-sorting whole lists.

/// Urgency category calculation.
pub mod category;
/// Recency and manual-order comparators.
pub mod comparator;
/// Stable error types.
pub mod error;
/// Event feed consumed by the organizer.
pub mod event;
/// Full list generation on (re)connect.
pub mod generation;
/// Connection state transitions.
pub mod lifecycle;
/// Event-driven organizer service.
pub mod organizer;
/// Insertion of rooms that changed lists.
pub mod placement;
/// Incremental single-room repositioning.
pub mod reposition;
/// Tokio task wrapper around the organizer.
pub mod runtime;
/// Collaborator traits and in-memory implementations.
pub mod source;
/// Room, list and configuration types.
pub mod types;
/// Unread message rules.
pub mod unread;

pub use category::room_category;
pub use comparator::{ListComparator, ManualComparator, RecencyComparator, RecencyKey};
pub use error::RoomListError;
pub use event::{ConnectionState, OrganizerEvent};
pub use generation::{Classifier, generate_initial_lists};
pub use lifecycle::{ConnectionLifecycle, LifecycleAction};
pub use organizer::{
    Collaborators, EventOutcome, IgnoreReason, OrganizerState, RoomListOrganizer, project,
};
pub use placement::{lists_containing, relocate};
pub use reposition::reposition;
pub use runtime::{ChangeStream, OrganizerHandle, spawn_organizer};
pub use source::{
    CUSTOM_TAGS_FEATURE, DirectRoomLookup, FeatureFlags, InMemoryDirectRooms, InMemoryRoomStore,
    RoomSource, StaticFeatureFlags,
};
pub use types::{
    Category, ListEntry, ListKey, ListsChanged, ManualOrderOverride, Membership, OrganizerConfig,
    Room, RoomListSnapshot, RoomLists, SortDiscipline, TAG_FAVOURITE, TAG_LOW_PRIORITY,
    TAG_SERVER_NOTICE, TagInfo, TimelineEvent,
};
pub use unread::{DefaultUnreadPolicy, UnreadPolicy};

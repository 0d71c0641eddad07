use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, PoisonError, RwLock},
};

use crate::types::Room;

/// Feature flag gating user-defined (custom) tag lists.
pub const CUSTOM_TAGS_FEATURE: &str = "feature_custom_tags";

/// Read access to the protocol client's rooms.
pub trait RoomSource: Send + Sync {
    /// Look up a room by ID.
    fn room(&self, room_id: &str) -> Option<Arc<Room>>;

    /// Every room known to the client.
    fn rooms(&self) -> Vec<Arc<Room>>;
}

/// Direct-message room mapping (`m.direct` account data).
pub trait DirectRoomLookup: Send + Sync {
    /// The user a DM room is shared with, if `room_id` is a DM.
    fn user_id_for_room(&self, room_id: &str) -> Option<String>;
}

/// Feature flag store.
pub trait FeatureFlags: Send + Sync {
    fn is_enabled(&self, feature: &str) -> bool;
}

/// Rooms held in memory, shared between the owner and the organizer.
#[derive(Clone, Default)]
pub struct InMemoryRoomStore {
    rooms: Arc<RwLock<HashMap<String, Arc<Room>>>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store seeded with `rooms`.
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let store = Self::new();
        for room in rooms {
            store.upsert(room);
        }
        store
    }

    /// Insert or replace a room, returning the shared handle.
    pub fn upsert(&self, room: Room) -> Arc<Room> {
        let room = Arc::new(room);
        self.rooms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(room.room_id.clone(), Arc::clone(&room));
        room
    }

    /// Apply `update` to a copy of the stored room and store the result.
    pub fn update<F>(&self, room_id: &str, update: F) -> Option<Arc<Room>>
    where
        F: FnOnce(&mut Room),
    {
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        let existing = rooms.get(room_id)?;
        let mut next = Room::clone(existing);
        update(&mut next);
        let next = Arc::new(next);
        rooms.insert(room_id.to_owned(), Arc::clone(&next));
        Some(next)
    }

    pub fn remove(&self, room_id: &str) -> Option<Arc<Room>> {
        self.rooms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(room_id)
    }
}

impl RoomSource for InMemoryRoomStore {
    fn room(&self, room_id: &str) -> Option<Arc<Room>> {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(room_id)
            .cloned()
    }

    /// Rooms sorted by room ID so generation is deterministic.
    fn rooms(&self) -> Vec<Arc<Room>> {
        let mut rooms: Vec<_> = self
            .rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        rooms
    }
}

/// DM mapping held in memory.
#[derive(Clone, Default)]
pub struct InMemoryDirectRooms {
    by_room: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryDirectRooms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, room_id: impl Into<String>, user_id: impl Into<String>) {
        self.by_room
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(room_id.into(), user_id.into());
    }

    pub fn remove(&self, room_id: &str) {
        self.by_room
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(room_id);
    }
}

impl DirectRoomLookup for InMemoryDirectRooms {
    fn user_id_for_room(&self, room_id: &str) -> Option<String> {
        self.by_room
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(room_id)
            .cloned()
    }
}

/// Fixed set of enabled features.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureFlags {
    enabled: HashSet<String>,
}

impl StaticFeatureFlags {
    pub fn new<I, S>(enabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: enabled.into_iter().map(Into::into).collect(),
        }
    }
}

impl FeatureFlags for StaticFeatureFlags {
    fn is_enabled(&self, feature: &str) -> bool {
        self.enabled.contains(feature)
    }
}

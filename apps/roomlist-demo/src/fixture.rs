//! Room fixtures and scripted event feeds.

use std::{collections::BTreeMap, fs, path::Path};

use roomlist_core::{InMemoryDirectRooms, InMemoryRoomStore, OrganizerEvent, Room};
use serde::Deserialize;

use crate::error::DemoError;

const BUILTIN_FIXTURE: &str = include_str!("../fixtures/builtin.json");

/// Initial rooms plus the events to replay against them.
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    pub rooms: Vec<Room>,
    /// Direct message rooms keyed by room ID, valued by the other user's ID.
    #[serde(default)]
    pub direct: BTreeMap<String, String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One scripted event, with the room updates the client applied before it.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub upsert: Vec<Room>,
    pub event: OrganizerEvent,
}

impl Fixture {
    pub fn builtin() -> Result<Self, DemoError> {
        Self::parse(BUILTIN_FIXTURE)
    }

    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let raw = fs::read_to_string(path).map_err(|source| DemoError::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self, DemoError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn room_store(&self) -> InMemoryRoomStore {
        InMemoryRoomStore::with_rooms(self.rooms.iter().cloned())
    }

    pub fn direct_rooms(&self) -> InMemoryDirectRooms {
        let direct = InMemoryDirectRooms::new();
        for (room_id, user_id) in &self.direct {
            direct.insert(room_id.as_str(), user_id.as_str());
        }
        direct
    }
}

impl Step {
    /// Mirror what the protocol client does before dispatching the event:
    /// replace upserted rooms and append live timeline events.
    pub fn apply(&self, store: &InMemoryRoomStore, own_user_id: &str) {
        for room in &self.upsert {
            store.upsert(room.clone());
        }

        if let OrganizerEvent::TimelineEventAppended {
            room_id,
            event,
            is_live: true,
        } = &self.event
        {
            store.update(room_id, |room| {
                room.timeline.push(event.clone());
                if event.sender != own_user_id {
                    room.unread_notifications += 1;
                }
            });
        }
    }
}

//! Event-driven room list organizer.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, trace};

use crate::{
    comparator::RecencyComparator,
    event::OrganizerEvent,
    generation::{self, Classifier},
    lifecycle::{ConnectionLifecycle, LifecycleAction},
    placement::{lists_containing, relocate},
    reposition::reposition,
    source::{CUSTOM_TAGS_FEATURE, DirectRoomLookup, FeatureFlags, RoomSource},
    types::{Category, ListKey, ListsChanged, OrganizerConfig, RoomListSnapshot, RoomLists},
    unread::UnreadPolicy,
};

/// Categorized lists plus readiness and the room currently in view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizerState {
    pub lists: RoomLists,
    /// Set once initial generation completed; incremental updates wait for it.
    pub ready: bool,
    /// Room in view. Its category is frozen while sticky.
    pub sticky_room_id: Option<String>,
}

/// External services the organizer reads from.
#[derive(Clone)]
pub struct Collaborators {
    pub rooms: Arc<dyn RoomSource>,
    pub direct_rooms: Arc<dyn DirectRoomLookup>,
    pub features: Arc<dyn FeatureFlags>,
    pub unread: Arc<dyn UnreadPolicy>,
}

impl Collaborators {
    pub fn new(
        rooms: Arc<dyn RoomSource>,
        direct_rooms: Arc<dyn DirectRoomLookup>,
        features: Arc<dyn FeatureFlags>,
        unread: Arc<dyn UnreadPolicy>,
    ) -> Self {
        Self {
            rooms,
            direct_rooms,
            features,
            unread,
        }
    }
}

/// Result of feeding one event to the organizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// State was replaced and a change notification was sent.
    Applied,
    /// The event was dropped; state is unchanged.
    Ignored(IgnoreReason),
}

/// Why an event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Initial generation has not completed.
    NotReady,
    /// The referenced room is unknown to the client.
    UnknownRoom,
    /// The event carried no room ID.
    MissingRoomId,
    /// The room is sticky; its position is frozen.
    StickyRoom,
    /// The viewed room did not change.
    AlreadyViewed,
    /// The event does not affect ordering (not live, or not activity).
    NotActivity,
    /// The room is in no list and belongs to none.
    NotListed,
    /// Connection transition without list impact.
    NoTransition,
    /// Event kind the organizer does not act on.
    Unsupported,
}

/// Keeps room lists categorized and ordered in response to client events.
pub struct RoomListOrganizer {
    config: OrganizerConfig,
    collaborators: Collaborators,
    state: Arc<OrganizerState>,
    lifecycle: ConnectionLifecycle,
    snapshot_tx: watch::Sender<Arc<RoomListSnapshot>>,
    changes_tx: broadcast::Sender<ListsChanged>,
}

impl RoomListOrganizer {
    pub fn new(config: OrganizerConfig, collaborators: Collaborators) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(RoomListSnapshot::new()));
        let (changes_tx, _) = broadcast::channel(config.change_buffer.max(1));
        Self {
            config,
            collaborators,
            state: Arc::new(OrganizerState::default()),
            lifecycle: ConnectionLifecycle::default(),
            snapshot_tx,
            changes_tx,
        }
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Current state, including categories.
    pub fn state(&self) -> Arc<OrganizerState> {
        Arc::clone(&self.state)
    }

    /// Current room IDs per list. Earlier snapshots stay valid after updates.
    pub fn snapshot(&self) -> Arc<RoomListSnapshot> {
        Arc::clone(&self.snapshot_tx.borrow())
    }

    /// Receiver that always holds the latest snapshot.
    pub fn watch_snapshots(&self) -> watch::Receiver<Arc<RoomListSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Change notifications, one per state mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<ListsChanged> {
        self.changes_tx.subscribe()
    }

    pub(crate) fn change_sender(&self) -> broadcast::Sender<ListsChanged> {
        self.changes_tx.clone()
    }

    /// Feed one event. Events must be delivered in arrival order.
    pub fn handle_event(&mut self, event: OrganizerEvent) -> EventOutcome {
        let kind = event.kind();
        let outcome = self.dispatch(event);
        match outcome {
            EventOutcome::Applied => debug!(event = kind, "room lists updated"),
            EventOutcome::Ignored(reason) => trace!(event = kind, ?reason, "event ignored"),
        }
        outcome
    }

    /// Rebuild every list from the room source and mark the organizer ready.
    pub fn generate_initial_lists(&mut self) {
        let rooms = self.collaborators.rooms.rooms();
        let lists = {
            let classifier = self.classifier();
            let recency = self.recency();
            generation::generate_initial_lists(&rooms, &classifier, &recency, None)
        };
        debug!(room_count = rooms.len(), list_count = lists.len(), "generated initial room lists");
        self.commit(OrganizerState {
            lists,
            ready: true,
            sticky_room_id: self.state.sticky_room_id.clone(),
        });
    }

    fn dispatch(&mut self, event: OrganizerEvent) -> EventOutcome {
        match event {
            OrganizerEvent::ConnectionStateChanged { previous, state } => {
                match self.lifecycle.observe(previous, state) {
                    LifecycleAction::Generate => {
                        self.generate_initial_lists();
                        EventOutcome::Applied
                    }
                    LifecycleAction::Reset => {
                        self.reset();
                        EventOutcome::Applied
                    }
                    LifecycleAction::None => EventOutcome::Ignored(IgnoreReason::NoTransition),
                }
            }
            OrganizerEvent::Disconnected => {
                self.lifecycle.clear();
                self.reset();
                EventOutcome::Applied
            }
            _ if !self.state.ready => EventOutcome::Ignored(IgnoreReason::NotReady),
            OrganizerEvent::TimelineEventAppended {
                room_id,
                event,
                is_live,
            } => {
                if !is_live || !self.recency().triggers_reorder(&event) {
                    return EventOutcome::Ignored(IgnoreReason::NotActivity);
                }
                self.room_update_triggered(&room_id)
            }
            OrganizerEvent::EventDecrypted {
                room_id,
                event,
                in_live_timeline,
            } => {
                let Some(room_id) = room_id else {
                    return EventOutcome::Ignored(IgnoreReason::MissingRoomId);
                };
                if self.collaborators.rooms.room(&room_id).is_none() {
                    return EventOutcome::Ignored(IgnoreReason::UnknownRoom);
                }
                if !in_live_timeline || !self.recency().triggers_reorder(&event) {
                    return EventOutcome::Ignored(IgnoreReason::NotActivity);
                }
                self.room_update_triggered(&room_id)
            }
            OrganizerEvent::RoomMembershipChanged { room_id }
            | OrganizerEvent::RoomAdded { room_id } => self.room_update_triggered(&room_id),
            OrganizerEvent::ViewRoom { room_id } => self.view_room(room_id),
            OrganizerEvent::RoomTagChanged { room_id }
            | OrganizerEvent::TagActionOptimistic { room_id, .. }
            | OrganizerEvent::TagActionFailed { room_id, .. } => {
                debug!(%room_id, "tag updates are not applied incrementally");
                EventOutcome::Ignored(IgnoreReason::Unsupported)
            }
            OrganizerEvent::AccountDataChanged { event_type } => {
                debug!(%event_type, "account data changes are not applied incrementally");
                EventOutcome::Ignored(IgnoreReason::Unsupported)
            }
            OrganizerEvent::Other { .. } => EventOutcome::Ignored(IgnoreReason::Unsupported),
        }
    }

    fn room_update_triggered(&mut self, room_id: &str) -> EventOutcome {
        let Some(room) = self.collaborators.rooms.room(room_id) else {
            debug!(%room_id, "event references unknown room");
            return EventOutcome::Ignored(IgnoreReason::UnknownRoom);
        };
        let sticky = self.state.sticky_room_id.as_deref();
        if sticky == Some(room_id) {
            return EventOutcome::Ignored(IgnoreReason::StickyRoom);
        }

        let classifier = self.classifier();
        let placements = classifier.placements(&room);
        let current = lists_containing(&self.state.lists, room_id);
        let mut target: Vec<ListKey> = placements.iter().map(|(key, _)| key.clone()).collect();
        target.sort();

        let lists = if current.is_empty() && target.is_empty() {
            return EventOutcome::Ignored(IgnoreReason::NotListed);
        } else if current == target {
            let category = classifier.update_category(&room);
            reposition(&self.state.lists, room_id, category, sticky)
        } else {
            debug!(%room_id, ?current, ?target, "moving room between lists");
            relocate(
                &self.state.lists,
                &room,
                &placements,
                self.collaborators.rooms.as_ref(),
                &self.recency(),
                sticky,
            )
        };

        self.commit(OrganizerState {
            lists,
            ready: true,
            sticky_room_id: self.state.sticky_room_id.clone(),
        });
        EventOutcome::Applied
    }

    /// `None` means no room is in view any more.
    fn view_room(&mut self, room_id: Option<String>) -> EventOutcome {
        if self.state.sticky_room_id == room_id {
            return EventOutcome::Ignored(IgnoreReason::AlreadyViewed);
        }

        // The new sticky room must be in place before the previous one is
        // demoted, otherwise the wrong room is treated as sticky.
        let mut lists = self.state.lists.clone();
        if let Some(previous) = self.state.sticky_room_id.as_deref()
            && self.collaborators.rooms.room(previous).is_some()
        {
            trace!(%previous, "demoting previously viewed room");
            lists = reposition(&lists, previous, Category::Idle, room_id.as_deref());
        }

        self.commit(OrganizerState {
            lists,
            ready: self.state.ready,
            sticky_room_id: room_id,
        });
        EventOutcome::Applied
    }

    fn reset(&mut self) {
        debug!("resetting room lists");
        self.commit(OrganizerState::default());
    }

    fn commit(&mut self, next: OrganizerState) {
        let snapshot = project(&next.lists);
        self.state = Arc::new(next);
        self.snapshot_tx.send_replace(Arc::new(snapshot));
        let _ = self.changes_tx.send(ListsChanged);
    }

    fn classifier(&self) -> Classifier<'_> {
        Classifier {
            unread: self.collaborators.unread.as_ref(),
            direct_rooms: self.collaborators.direct_rooms.as_ref(),
            custom_tags: self.collaborators.features.is_enabled(CUSTOM_TAGS_FEATURE),
            order_by_importance: self.config.order_by_importance,
        }
    }

    fn recency(&self) -> RecencyComparator<'_> {
        RecencyComparator::new(self.collaborators.unread.as_ref(), &self.config.own_user_id)
    }
}

/// Drop categories, keeping room IDs in display order.
pub fn project(lists: &RoomLists) -> RoomListSnapshot {
    lists
        .iter()
        .map(|(key, entries)| {
            let ids = entries.iter().map(|entry| entry.room_id.clone()).collect();
            (key.clone(), ids)
        })
        .collect()
}

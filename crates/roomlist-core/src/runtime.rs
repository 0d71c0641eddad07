//! Async wrapper that owns an organizer and feeds it from a channel.

use std::sync::Arc;

use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    error::RoomListError,
    event::OrganizerEvent,
    organizer::RoomListOrganizer,
    types::{ListsChanged, RoomListSnapshot},
};

/// Change notification stream handed to UI subscribers.
pub type ChangeStream = broadcast::Receiver<ListsChanged>;

/// Handle to an organizer running on its own task.
#[derive(Debug)]
pub struct OrganizerHandle {
    feed_tx: mpsc::Sender<OrganizerEvent>,
    changes_tx: broadcast::Sender<ListsChanged>,
    snapshots: watch::Receiver<Arc<RoomListSnapshot>>,
    stop: CancellationToken,
    task: JoinHandle<()>,
}

impl OrganizerHandle {
    /// Queue one event. Events are applied in the order they are sent.
    pub async fn send(&self, event: OrganizerEvent) -> Result<(), RoomListError> {
        self.feed_tx
            .send(event)
            .await
            .map_err(|_| RoomListError::FeedClosed)
    }

    /// Clone the feed sender for producers living elsewhere.
    pub fn feed_sender(&self) -> mpsc::Sender<OrganizerEvent> {
        self.feed_tx.clone()
    }

    pub fn subscribe(&self) -> ChangeStream {
        self.changes_tx.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<RoomListSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    pub fn watch_snapshots(&self) -> watch::Receiver<Arc<RoomListSnapshot>> {
        self.snapshots.clone()
    }

    /// Stop the task after the event in progress and wait for it to exit.
    pub async fn shutdown(self) {
        self.stop.cancel();
        let _ = self.task.await;
    }
}

/// Move `organizer` onto a tokio task and return a handle to it.
pub fn spawn_organizer(organizer: RoomListOrganizer) -> OrganizerHandle {
    let (feed_tx, feed_rx) = mpsc::channel(organizer.config().feed_buffer.max(1));
    let changes_tx = organizer.change_sender();
    let snapshots = organizer.watch_snapshots();
    let stop = CancellationToken::new();
    let task = tokio::spawn(run(organizer, feed_rx, stop.clone()));

    OrganizerHandle {
        feed_tx,
        changes_tx,
        snapshots,
        stop,
        task,
    }
}

async fn run(
    mut organizer: RoomListOrganizer,
    mut feed_rx: mpsc::Receiver<OrganizerEvent>,
    stop: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => {
                debug!("organizer runtime stopping");
                break;
            }
            event = feed_rx.recv() => {
                let Some(event) = event else {
                    debug!("organizer feed closed");
                    break;
                };
                organizer.handle_event(event);
            }
        }
    }
}

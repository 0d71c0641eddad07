mod config;
mod error;
mod fixture;
mod logging;

use std::{sync::Arc, time::Duration};

use config::DemoConfig;
use error::DemoError;
use fixture::Fixture;
use roomlist_core::{
    CUSTOM_TAGS_FEATURE, ChangeStream, Collaborators, DefaultUnreadPolicy, OrganizerHandle,
    RoomListOrganizer, RoomListSnapshot, StaticFeatureFlags, spawn_organizer,
};
use tokio::time::timeout;
use tracing::{debug, error, info};

/// How long to wait for a change notification after each scripted event.
/// Ignored events never produce one.
const STEP_SETTLE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(err) = run().await {
        error!(error = %err, "room list demo failed");
        eprintln!("roomlist-demo: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DemoError> {
    let config = DemoConfig::from_env()?;
    let fixture = match &config.fixture_path {
        Some(path) => Fixture::load(path)?,
        None => Fixture::builtin()?,
    };
    info!(
        rooms = fixture.rooms.len(),
        steps = fixture.steps.len(),
        custom_tags = config.custom_tags,
        "loaded room fixture"
    );

    let store = fixture.room_store();
    let features = if config.custom_tags {
        StaticFeatureFlags::new([CUSTOM_TAGS_FEATURE])
    } else {
        StaticFeatureFlags::default()
    };
    let collaborators = Collaborators::new(
        Arc::new(store.clone()),
        Arc::new(fixture.direct_rooms()),
        Arc::new(features),
        Arc::new(DefaultUnreadPolicy::new(
            config.organizer.own_user_id.clone(),
        )),
    );

    let handle = spawn_organizer(RoomListOrganizer::new(
        config.organizer.clone(),
        collaborators,
    ));
    let mut changes = handle.subscribe();

    for (index, step) in fixture.steps.iter().enumerate() {
        step.apply(&store, &config.organizer.own_user_id);
        let kind = step.event.kind();
        handle.send(step.event.clone()).await?;

        if wait_for_change(&mut changes).await {
            println!("after step {} ({kind}):", index + 1);
            print_snapshot(&handle);
        } else {
            debug!(step = index + 1, event = kind, "no list change");
        }
    }

    handle.shutdown().await;
    Ok(())
}

async fn wait_for_change(changes: &mut ChangeStream) -> bool {
    matches!(timeout(STEP_SETTLE, changes.recv()).await, Ok(Ok(_)))
}

fn print_snapshot(handle: &OrganizerHandle) {
    let snapshot: Arc<RoomListSnapshot> = handle.snapshot();
    if snapshot.is_empty() {
        println!("  (no lists)");
        return;
    }
    for (key, room_ids) in snapshot.iter() {
        if room_ids.is_empty() {
            continue;
        }
        println!("  {key}: {}", room_ids.join(", "));
    }
}

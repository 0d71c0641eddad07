use std::{io, path::PathBuf};

use roomlist_core::RoomListError;
use thiserror::Error;

/// Failures that abort the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    RoomList(#[from] RoomListError),
    #[error("failed to read fixture {}: {source}", path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse fixture: {0}")]
    FixtureParse(#[from] serde_json::Error),
}

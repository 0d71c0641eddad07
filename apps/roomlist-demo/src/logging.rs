//! Tracing bootstrap for the demo binary.

use std::env;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,roomlist_core=debug,roomlist_demo=debug";

/// Filter sources, highest precedence first.
const FILTER_VARS: [&str; 2] = ["RUST_LOG", "ROOMLIST_LOG"];

/// Initialize the global tracing subscriber.
///
/// The first of `RUST_LOG`, `ROOMLIST_LOG` holding a valid directive wins;
/// otherwise the built-in default applies. Per-event organizer traces are
/// only visible with `roomlist_core=trace`.
pub fn init() {
    let directive = filter_directive(|key| env::var(key).ok());
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_env_filter(EnvFilter::new(directive))
        .try_init();
}

fn filter_directive<F>(mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    FILTER_VARS
        .iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty() && EnvFilter::try_new(value).is_ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned())
}

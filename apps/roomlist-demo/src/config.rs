//! Environment-backed configuration for `roomlist-demo`.

use std::{env, path::PathBuf};

use roomlist_core::{OrganizerConfig, RoomListError};

const DEFAULT_USER_ID: &str = "@demo:example.org";

/// Runtime configuration used by the demo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Organizer tuning forwarded to the core crate.
    pub organizer: OrganizerConfig,
    /// JSON fixture to load instead of the built-in one.
    pub fixture_path: Option<PathBuf>,
    /// Whether `feature_custom_tags` is enabled.
    pub custom_tags: bool,
}

impl DemoConfig {
    /// Parse configuration from environment variables.
    pub fn from_env() -> Result<Self, RoomListError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(mut lookup: F) -> Result<Self, RoomListError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let own_user_id = optional_trimmed_env("ROOMLIST_USER_ID", &mut lookup)
            .unwrap_or_else(|| DEFAULT_USER_ID.to_owned());
        let defaults = OrganizerConfig::new(own_user_id);

        let order_by_importance = parse_optional_bool(
            "ROOMLIST_ORDER_BY_IMPORTANCE",
            defaults.order_by_importance,
            &mut lookup,
        )?;
        let change_buffer =
            parse_positive_usize("ROOMLIST_CHANGE_BUFFER", defaults.change_buffer, &mut lookup)?;
        let feed_buffer =
            parse_positive_usize("ROOMLIST_FEED_BUFFER", defaults.feed_buffer, &mut lookup)?;
        let fixture_path = optional_trimmed_env("ROOMLIST_FIXTURE", &mut lookup).map(PathBuf::from);
        let custom_tags = parse_optional_bool("ROOMLIST_CUSTOM_TAGS", false, &mut lookup)?;

        Ok(Self {
            organizer: OrganizerConfig {
                order_by_importance,
                change_buffer,
                feed_buffer,
                ..defaults
            },
            fixture_path,
            custom_tags,
        })
    }
}

fn optional_trimmed_env<F>(key: &'static str, lookup: &mut F) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_optional_bool<F>(
    key: &'static str,
    default: bool,
    lookup: &mut F,
) -> Result<bool, RoomListError>
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(value) = optional_trimmed_env(key, lookup) else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RoomListError::invalid_config(
            key,
            value,
            "expected true or false",
        )),
    }
}

fn parse_positive_usize<F>(
    key: &'static str,
    default: usize,
    lookup: &mut F,
) -> Result<usize, RoomListError>
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(value) = optional_trimmed_env(key, lookup) else {
        return Ok(default);
    };
    match value.parse::<usize>() {
        Ok(0) => Err(RoomListError::invalid_config(key, value, "must be at least 1")),
        Ok(parsed) => Ok(parsed),
        Err(err) => Err(RoomListError::invalid_config(key, value, err.to_string())),
    }
}

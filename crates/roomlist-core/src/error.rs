use thiserror::Error;

/// Errors surfaced by the room list organizer and its runtime.
///
/// The ordering algorithms themselves never fail; stale or premature events
/// are dropped and reported through [`crate::EventOutcome`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomListError {
    /// The organizer runtime stopped and no longer accepts events.
    #[error("organizer event feed is closed")]
    FeedClosed,
    /// A configuration value could not be parsed or is out of range.
    #[error("invalid {key}='{value}': {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl RoomListError {
    /// Build an invalid configuration error.
    pub fn invalid_config(
        key: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_message_names_key_and_value() {
        let err = RoomListError::invalid_config("ROOMLIST_FEED_BUFFER", "abc", "not a number");
        assert_eq!(
            err.to_string(),
            "invalid ROOMLIST_FEED_BUFFER='abc': not a number"
        );
    }

    #[test]
    fn feed_closed_message_is_stable() {
        assert_eq!(
            RoomListError::FeedClosed.to_string(),
            "organizer event feed is closed"
        );
    }
}

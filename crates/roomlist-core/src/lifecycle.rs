use crate::event::ConnectionState;

/// What the organizer must do after a connection state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Rebuild every list from scratch.
    Generate,
    /// Drop all lists and become unready.
    Reset,
    /// Nothing to do.
    None,
}

/// Tracks the sync connection state and maps transitions to organizer actions.
#[derive(Debug, Clone, Default)]
pub struct ConnectionLifecycle {
    state: Option<ConnectionState>,
}

impl ConnectionLifecycle {
    pub fn state(&self) -> Option<ConnectionState> {
        self.state
    }

    /// Record a transition. `previous` overrides the tracked state when the
    /// client reports it.
    pub fn observe(
        &mut self,
        previous: Option<ConnectionState>,
        next: ConnectionState,
    ) -> LifecycleAction {
        let previous = previous.or(self.state);
        self.state = Some(next);

        match next {
            ConnectionState::Prepared if previous != Some(ConnectionState::Prepared) => {
                LifecycleAction::Generate
            }
            ConnectionState::Stopped => LifecycleAction::Reset,
            _ => LifecycleAction::None,
        }
    }

    /// Forget the tracked state (session ended).
    pub fn clear(&mut self) {
        self.state = None;
    }
}

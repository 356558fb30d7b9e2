//! Hub lifecycle state
//!
//! A hub starts `Open` and is closed exactly once, by `error`, `complete` or
//! `force_close`. The terminal error lives inside the `Closed` variant, so an
//! error can never be recorded on an open hub.

/// Lifecycle state of a hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubState<E> {
    /// Accepting input and listeners
    Open,
    /// Terminated; replays its terminal event to late listeners
    Closed {
        /// Terminal error, if the hub was failed rather than completed
        error: Option<E>,
    },
}

impl<E> HubState<E> {
    /// Whether the hub accepts input
    pub fn is_open(&self) -> bool {
        matches!(self, HubState::Open)
    }

    /// Whether the hub has terminated
    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    /// Whether the hub terminated with an error
    pub fn has_error(&self) -> bool {
        matches!(self, HubState::Closed { error: Some(_) })
    }

    /// The terminal error, if any
    pub fn error(&self) -> Option<&E> {
        match self {
            HubState::Closed { error } => error.as_ref(),
            HubState::Open => None,
        }
    }

    /// Close the hub
    ///
    /// Returns `false` and leaves the state untouched if already closed.
    pub(crate) fn close(&mut self, error: Option<E>) -> bool {
        if self.is_closed() {
            return false;
        }
        *self = HubState::Closed { error };
        true
    }
}

impl<E> Default for HubState<E> {
    fn default() -> Self {
        HubState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut state: HubState<&str> = HubState::default();

        assert!(state.is_open());
        assert!(!state.has_error());
        assert_eq!(state.error(), None);

        assert!(state.close(Some("boom")));
        assert!(state.is_closed());
        assert!(state.has_error());
        assert_eq!(state.error(), Some(&"boom"));
    }

    #[test]
    fn test_close_once() {
        let mut state: HubState<&str> = HubState::Open;

        assert!(state.close(None));
        assert!(!state.close(Some("late")));

        // First terminal event wins
        assert_eq!(state, HubState::Closed { error: None });
        assert!(!state.has_error());
    }
}

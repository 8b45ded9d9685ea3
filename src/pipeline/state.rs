//! Playback state management

use crate::runtime::ProcessingState;

/// Playback state machine
///
/// Represents the logical play/pause status of the viewer pipeline. Owned by
/// the playback controller and mutated only through its operations; endpoint
/// callbacks never touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Pipeline assembled but never started
    Uninitialized,

    /// Pipeline prerolled, video frozen
    Paused,

    /// Pipeline actively rendering the stream
    Playing,

    /// Pipeline torn down; terminal, cannot be restarted
    Stopped,
}

impl PlaybackState {
    /// Check whether `start()` is permitted from this state
    pub fn can_start(&self) -> bool {
        matches!(self, PlaybackState::Uninitialized | PlaybackState::Paused)
    }

    /// State reached by a pause/resume toggle, if the toggle is permitted
    pub fn toggled(&self) -> Option<PlaybackState> {
        match self {
            PlaybackState::Playing => Some(PlaybackState::Paused),
            PlaybackState::Paused => Some(PlaybackState::Playing),
            _ => None,
        }
    }

    /// Processing state the runtime must be driven to for this state
    ///
    /// Uninitialized maps to nothing: the runtime is left wherever element
    /// construction put it.
    pub fn processing_target(&self) -> Option<ProcessingState> {
        match self {
            PlaybackState::Uninitialized => None,
            PlaybackState::Paused => Some(ProcessingState::Paused),
            PlaybackState::Playing => Some(ProcessingState::Playing),
            PlaybackState::Stopped => Some(ProcessingState::Null),
        }
    }

    /// Check if the pipeline has been torn down
    pub fn is_stopped(&self) -> bool {
        matches!(self, PlaybackState::Stopped)
    }

    /// Get a human-readable description of this state
    pub fn description(&self) -> &'static str {
        match self {
            PlaybackState::Uninitialized => "Uninitialized",
            PlaybackState::Paused => "Paused",
            PlaybackState::Playing => "Playing",
            PlaybackState::Stopped => "Stopped",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_permissions() {
        assert!(PlaybackState::Uninitialized.can_start());
        assert!(PlaybackState::Paused.can_start());
        assert!(!PlaybackState::Playing.can_start());
        assert!(!PlaybackState::Stopped.can_start());
    }

    #[test]
    fn test_toggle_transitions() {
        assert_eq!(
            PlaybackState::Playing.toggled(),
            Some(PlaybackState::Paused)
        );
        assert_eq!(
            PlaybackState::Paused.toggled(),
            Some(PlaybackState::Playing)
        );
        assert_eq!(PlaybackState::Uninitialized.toggled(), None);
        assert_eq!(PlaybackState::Stopped.toggled(), None);
    }

    #[test]
    fn test_toggle_pairs_return_to_origin() {
        for state in [PlaybackState::Playing, PlaybackState::Paused] {
            let there = state.toggled().unwrap();
            assert_eq!(there.toggled(), Some(state));
        }
    }

    #[test]
    fn test_processing_targets() {
        assert_eq!(PlaybackState::Uninitialized.processing_target(), None);
        assert_eq!(
            PlaybackState::Paused.processing_target(),
            Some(ProcessingState::Paused)
        );
        assert_eq!(
            PlaybackState::Playing.processing_target(),
            Some(ProcessingState::Playing)
        );
        assert_eq!(
            PlaybackState::Stopped.processing_target(),
            Some(ProcessingState::Null)
        );
    }

    #[test]
    fn test_state_checks() {
        assert!(PlaybackState::Stopped.is_stopped());
        assert!(!PlaybackState::Playing.is_stopped());
        assert_eq!(PlaybackState::Playing.to_string(), "Playing");
    }
}

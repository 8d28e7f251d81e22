//! Shared types for the ringd bridge API

use chrono::{DateTime, Local};
use ringd_util::SessionId;
use serde::{Deserialize, Serialize};

/// Externally visible alarm lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmState {
    /// No session, no resources held
    Idle,
    /// Notification shown, playback being acquired
    Starting,
    /// Playback looping, notification visible with a stop affordance
    Playing,
    /// Playback and notification being released
    Stopping,
}

impl AlarmState {
    /// True while the session holds (or is about to hold) resources
    pub fn is_active(&self) -> bool {
        !matches!(self, AlarmState::Idle)
    }
}

/// Parameters supplied by the trigger for a start request.
///
/// Both fields are optional: a missing note gets a default message, a missing
/// audio source falls back to the built-in tone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartParams {
    /// Text to display in the persistent notification
    #[serde(default)]
    pub note: Option<String>,

    /// URI-like reference to the audio clip to loop
    #[serde(default)]
    pub audio_source: Option<String>,
}

/// Snapshot of the current alarm state for status queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmSnapshot {
    pub state: AlarmState,
    pub session_id: Option<SessionId>,
    pub note: Option<String>,
    pub audio_source: Option<String>,
    pub started_at: Option<DateTime<Local>>,
}

impl AlarmSnapshot {
    /// Snapshot of the idle state
    pub fn idle() -> Self {
        Self {
            state: AlarmState::Idle,
            session_id: None,
            note: None,
            audio_source: None,
            started_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_not_active() {
        assert!(!AlarmState::Idle.is_active());
        assert!(AlarmState::Starting.is_active());
        assert!(AlarmState::Playing.is_active());
        assert!(AlarmState::Stopping.is_active());
    }

    #[test]
    fn start_params_default_is_empty() {
        let params = StartParams::default();
        assert!(params.note.is_none());
        assert!(params.audio_source.is_none());
    }

    #[test]
    fn snapshot_serialization() {
        let snapshot = AlarmSnapshot::idle();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: AlarmSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.state, AlarmState::Idle);
        assert!(parsed.session_id.is_none());
    }
}

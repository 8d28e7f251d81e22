//! Command and reply types for the ringd trigger bridge
//!
//! The original design encoded "stop" as a string action on an intent; here
//! the bridge speaks typed commands so an invalid trigger cannot reach the
//! session manager.

use ringd_util::SessionId;
use serde::{Deserialize, Serialize};

use crate::{AlarmSnapshot, StartParams};

/// Commands accepted from the trigger bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeCommand {
    /// Start the alarm, or refresh the notification if already ringing
    Start(StartParams),

    /// Stop the alarm and release all resources
    Stop,

    /// Query the current alarm state
    Status,
}

/// Replies returned to the trigger bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeReply {
    /// A new session started and playback is looping
    Started { session_id: SessionId },

    /// A session was already active; the notification was refreshed and
    /// playback left untouched
    Refreshed { session_id: SessionId },

    /// The session was stopped and its resources released
    Stopped { session_id: SessionId },

    /// Stop requested with no active session (not an error)
    NotRunning,

    /// Current state
    Status(AlarmSnapshot),

    /// The command failed
    Error { code: ErrorCode, message: String },
}

/// Error codes surfaced to the trigger bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Playback or notification acquisition failed; the manager is back
    /// to idle with nothing held
    StartFailed,

    /// A start arrived while a stop was in flight
    ConflictingTransition,

    /// The command could not be parsed
    InvalidRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = BridgeCommand::Start(StartParams {
            note: Some("wake up".into()),
            audio_source: None,
        });
        let json = serde_json::to_string(&cmd).unwrap();
        let parsed: BridgeCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, parsed);
    }

    #[test]
    fn stop_command_has_no_payload() {
        let json = serde_json::to_string(&BridgeCommand::Stop).unwrap();
        assert_eq!(json, r#"{"type":"stop"}"#);
    }

    #[test]
    fn reply_serialization() {
        let reply = BridgeReply::Error {
            code: ErrorCode::ConflictingTransition,
            message: "stop in flight".into(),
        };
        let json = serde_json::to_string(&reply).unwrap();
        let parsed: BridgeReply = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            parsed,
            BridgeReply::Error {
                code: ErrorCode::ConflictingTransition,
                ..
            }
        ));
    }
}

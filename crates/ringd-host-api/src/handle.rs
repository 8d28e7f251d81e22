//! Resource handle abstractions

use ringd_util::SessionId;
use serde::{Deserialize, Serialize};

/// Opaque handle to an acquired playback resource
///
/// Created by a playback host when a source is opened. The core never looks
/// inside the payload; it only hands the handle back for start/stop/release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackHandle {
    /// Session this playback belongs to
    pub session_id: SessionId,

    /// Platform-specific payload (opaque to core)
    payload: PlaybackPayload,
}

impl PlaybackHandle {
    pub fn new(session_id: SessionId, payload: PlaybackPayload) -> Self {
        Self {
            session_id,
            payload,
        }
    }

    pub fn payload(&self) -> &PlaybackPayload {
        &self.payload
    }
}

/// Platform-specific playback payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum PlaybackPayload {
    /// Desktop: sink slot on the audio worker thread
    Desktop { sink_id: u64 },

    /// Mock for testing
    Mock { id: u64 },
}

impl PlaybackPayload {
    /// Get the sink slot if applicable
    pub fn sink_id(&self) -> Option<u64> {
        match self {
            PlaybackPayload::Desktop { sink_id } => Some(*sink_id),
            PlaybackPayload::Mock { .. } => None,
        }
    }
}

/// Opaque handle to a shown notification
///
/// Re-showing while a session is active replaces the platform notification
/// in place, so the slot stays stable for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationHandle {
    payload: NotificationPayload,
}

impl NotificationHandle {
    pub fn new(payload: NotificationPayload) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &NotificationPayload {
        &self.payload
    }
}

/// Platform-specific notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// Desktop: notification slot number
    Desktop { slot: u32 },

    /// Mock for testing
    Mock { slot: u32 },
}

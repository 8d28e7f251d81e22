//! Host adapter traits

use ringd_util::SessionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{NotificationHandle, PlaybackHandle};

/// Errors from host adapter operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Open failed: {0}")]
    OpenFailed(String),

    #[error("Start failed: {0}")]
    StartFailed(String),

    #[error("Stop failed: {0}")]
    StopFailed(String),

    #[error("Release failed: {0}")]
    ReleaseFailed(String),

    #[error("Channel registration failed: {0}")]
    ChannelFailed(String),

    #[error("Show failed: {0}")]
    ShowFailed(String),

    #[error("Cancel failed: {0}")]
    CancelFailed(String),

    #[error("Unknown resource handle")]
    UnknownHandle,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type HostResult<T> = Result<T, HostError>;

/// Reference to the audio clip an alarm should loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AudioSource {
    /// Built-in default tone, used when the trigger supplies no source
    Default,

    /// URI-like reference resolved by the playback host
    Uri { uri: String },
}

impl AudioSource {
    /// Map an optional trigger-supplied reference onto a source, falling
    /// back to the built-in default
    pub fn from_option(uri: Option<String>) -> Self {
        match uri {
            Some(uri) => AudioSource::Uri { uri },
            None => AudioSource::Default,
        }
    }

    /// The URI if this is not the default source
    pub fn uri(&self) -> Option<&str> {
        match self {
            AudioSource::Uri { uri } => Some(uri),
            AudioSource::Default => None,
        }
    }
}

/// How the output stream should be classified by platform audio policy.
///
/// Alarms must be acquired as `Alarm` so volume and interruption policy treat
/// them correctly; this is a required acquisition attribute, not polish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamIntent {
    Alarm,
    Media,
}

/// Everything a playback host needs to acquire a looping stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSpec {
    pub source: AudioSource,
    pub intent: StreamIntent,
}

impl PlaybackSpec {
    /// Spec for an alarm loop over the given source
    pub fn alarm(source: AudioSource) -> Self {
        Self {
            source,
            intent: StreamIntent::Alarm,
        }
    }
}

/// Notification channel registration data
///
/// Registration is one-time per process: re-registering the same identifier
/// is a no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub id: String,
    pub name: String,
    pub importance: ChannelImportance,
}

impl Default for ChannelSpec {
    fn default() -> Self {
        Self {
            id: "alarm_channel".into(),
            name: "Alarm".into(),
            importance: ChannelImportance::High,
        }
    }
}

/// Channel importance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelImportance {
    Low,
    Default,
    High,
}

/// Content of the persistent alarm notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub text: String,

    /// Sticky notifications cannot be dismissed by the user; only the stop
    /// affordance or `cancel` removes them
    pub sticky: bool,

    /// Label for the stop affordance, if one should be offered
    pub stop_action: Option<String>,
}

/// Playback host trait - implemented by platform-specific adapters
///
/// Looping is unconditional: every stream opened through this trait repeats
/// until stopped.
pub trait PlaybackHost: Send + Sync {
    /// Open the source and prepare a stream, without starting it
    fn open(&self, session_id: &SessionId, spec: &PlaybackSpec) -> HostResult<PlaybackHandle>;

    /// Start the looping stream
    fn start_looping(&self, handle: &PlaybackHandle) -> HostResult<()>;

    /// Stop playback. Calling this on a stream that never started, or on a
    /// handle the host no longer knows, is a no-op rather than an error.
    fn stop(&self, handle: &PlaybackHandle) -> HostResult<()>;

    /// Release the stream and its output resources. Idempotent, and safe to
    /// call after a failed open.
    fn release(&self, handle: &PlaybackHandle) -> HostResult<()>;
}

/// Notification host trait - implemented by platform-specific adapters
pub trait NotificationHost: Send + Sync {
    /// Register the notification channel. Idempotent: safe to call on every
    /// start, with no side effects beyond the first call for a given id.
    fn ensure_channel(&self, spec: &ChannelSpec) -> HostResult<()>;

    /// Show the notification, replacing (not stacking) any prior one
    fn show(&self, content: &NotificationContent) -> HostResult<NotificationHandle>;

    /// Remove the notification. Idempotent.
    fn cancel(&self, handle: &NotificationHandle) -> HostResult<()>;
}

//! Alarm session state

use chrono::{DateTime, Local};
use ringd_api::{AlarmSnapshot, AlarmState};
use ringd_host_api::{AudioSource, NotificationHandle, PlaybackHandle};
use ringd_util::SessionId;

/// The single logical "the alarm is ringing" instance.
///
/// A session exists only while the alarm is active; the manager holding no
/// session is the Idle state. Invariants:
/// - `playback` is `Some` iff `state == Playing`
/// - `notification` is `Some` from creation until final cleanup
/// - `audio_source` is fixed for the session's lifetime
#[derive(Debug)]
pub struct AlarmSession {
    /// Session identity, for logging and bridge replies
    pub session_id: SessionId,

    /// Current state (never Idle while the session exists)
    pub state: AlarmState,

    /// Source chosen at start, immutable for the session
    pub audio_source: AudioSource,

    /// Display text from the trigger; refreshed by repeated starts
    pub note: Option<String>,

    /// Playback handle, held only while looping
    pub playback: Option<PlaybackHandle>,

    /// Notification handle, held while the notification is visible
    pub notification: Option<NotificationHandle>,

    /// Wall-clock start time (for display/logging)
    pub started_at: DateTime<Local>,
}

impl AlarmSession {
    /// Create a session in Starting state, owning the already-shown
    /// notification. Playback is attached once acquisition succeeds.
    pub fn new(
        audio_source: AudioSource,
        note: Option<String>,
        notification: NotificationHandle,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            state: AlarmState::Starting,
            audio_source,
            note,
            playback: None,
            notification: Some(notification),
            started_at: now,
        }
    }

    /// Attach the playback handle once open + start succeed
    pub fn attach_playback(&mut self, handle: PlaybackHandle) {
        self.playback = Some(handle);
        self.state = AlarmState::Playing;
    }

    /// True while any resource handle is still owned
    pub fn holds_resources(&self) -> bool {
        self.playback.is_some() || self.notification.is_some()
    }

    /// Snapshot for status queries
    pub fn to_snapshot(&self) -> AlarmSnapshot {
        AlarmSnapshot {
            state: self.state,
            session_id: Some(self.session_id.clone()),
            note: self.note.clone(),
            audio_source: self.audio_source.uri().map(String::from),
            started_at: Some(self.started_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringd_host_api::{NotificationPayload, PlaybackPayload};

    fn make_session(source: AudioSource) -> AlarmSession {
        AlarmSession::new(
            source,
            Some("wake up".into()),
            NotificationHandle::new(NotificationPayload::Mock { slot: 1 }),
            Local::now(),
        )
    }

    #[test]
    fn new_session_is_starting_with_notification_only() {
        let session = make_session(AudioSource::Default);

        assert_eq!(session.state, AlarmState::Starting);
        assert!(session.playback.is_none());
        assert!(session.notification.is_some());
        assert!(session.holds_resources());
    }

    #[test]
    fn attach_playback_transitions_to_playing() {
        let mut session = make_session(AudioSource::Default);
        session.attach_playback(PlaybackHandle::new(
            session.session_id.clone(),
            PlaybackPayload::Mock { id: 1 },
        ));

        assert_eq!(session.state, AlarmState::Playing);
        assert!(session.playback.is_some());
    }

    #[test]
    fn snapshot_reports_uri_source() {
        let session = make_session(AudioSource::Uri {
            uri: "file:///tmp/tone.ogg".into(),
        });

        let snapshot = session.to_snapshot();
        assert_eq!(snapshot.state, AlarmState::Starting);
        assert_eq!(snapshot.audio_source.as_deref(), Some("file:///tmp/tone.ogg"));
        assert_eq!(snapshot.note.as_deref(), Some("wake up"));
    }

    #[test]
    fn snapshot_hides_default_source() {
        let session = make_session(AudioSource::Default);
        assert!(session.to_snapshot().audio_source.is_none());
    }
}

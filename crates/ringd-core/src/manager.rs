//! The alarm session manager
//!
//! Owns at most one [`AlarmSession`] and decides, for every start/stop
//! trigger, whether resources are acquired, refreshed, or released. The
//! critical rule: a start arriving while the alarm is already active must
//! never open a second playback stream, and every exit path funnels through
//! the same cleanup routine so no handle outlives the session.

use chrono::Local;
use ringd_api::{AlarmSnapshot, AlarmState, StartParams};
use ringd_host_api::{
    AudioSource, ChannelSpec, NotificationContent, NotificationHost, PlaybackHost, PlaybackSpec,
};
use ringd_util::{Result, RingError, SessionId};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::AlarmSession;

/// Notification title for a ringing alarm
const NOTIFICATION_TITLE: &str = "Alarm";

/// Body text when the trigger supplies no note
const DEFAULT_NOTE: &str = "Time to wake up!";

/// Label for the stop affordance on the notification
const STOP_ACTION_LABEL: &str = "Stop";

/// Outcome of a start trigger
#[derive(Debug)]
pub enum StartOutcome {
    /// A fresh session was created and playback is looping
    Started { session_id: SessionId },

    /// The alarm was already active; only the notification was refreshed
    Refreshed { session_id: SessionId },
}

/// Outcome of a stop trigger
#[derive(Debug)]
pub enum StopOutcome {
    /// The session ended and all resources were released
    Stopped { session_id: SessionId },

    /// Nothing was ringing; stop is a no-op
    NotRunning,
}

/// The alarm session manager.
///
/// Constructed once per process and referenced explicitly; concurrent
/// triggers are serialized by whoever hosts it (ringdd wraps it in a mutex),
/// and `&mut self` makes each transition atomic under that discipline.
pub struct AlarmManager {
    playback: Arc<dyn PlaybackHost>,
    notifier: Arc<dyn NotificationHost>,
    channel: ChannelSpec,
    session: Option<AlarmSession>,
}

impl AlarmManager {
    /// Create a new manager over the given hosts
    pub fn new(
        playback: Arc<dyn PlaybackHost>,
        notifier: Arc<dyn NotificationHost>,
        channel: ChannelSpec,
    ) -> Self {
        info!(channel_id = %channel.id, "Alarm manager initialized");

        Self {
            playback,
            notifier,
            channel,
            session: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AlarmState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(AlarmState::Idle)
    }

    /// True while playback is looping or being acquired
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Snapshot for the trigger bridge
    pub fn snapshot(&self) -> AlarmSnapshot {
        self.session
            .as_ref()
            .map(AlarmSession::to_snapshot)
            .unwrap_or_else(AlarmSnapshot::idle)
    }

    /// Handle a start trigger.
    ///
    /// Idle: show the notification, then acquire and start looping playback.
    /// Starting/Playing: refresh the notification only; playback is never
    /// re-acquired. Stopping: rejected with `ConflictingTransition` (the
    /// caller may retry once the stop has completed).
    pub fn start(&mut self, params: StartParams) -> Result<StartOutcome> {
        if let Some(session) = self.session.as_mut() {
            if session.state == AlarmState::Stopping {
                debug!(session_id = %session.session_id, "Start rejected, stop in flight");
                return Err(RingError::ConflictingTransition);
            }
            return Ok(Self::refresh(self.notifier.as_ref(), session, params));
        }

        // Channel registration is one-time per process; the notifier treats
        // repeats as no-ops, so every start may call it.
        self.notifier
            .ensure_channel(&self.channel)
            .map_err(|e| RingError::acquisition(e.to_string()))?;

        // Notification first, playback second: the ordering is part of the
        // contract, and the failed-start path below undoes the notification.
        let note = params.note;
        let notification = self
            .notifier
            .show(&Self::content(note.as_deref()))
            .map_err(|e| RingError::acquisition(e.to_string()))?;

        let source = AudioSource::from_option(params.audio_source);
        let mut session = AlarmSession::new(source, note, notification, Local::now());

        let spec = PlaybackSpec::alarm(session.audio_source.clone());
        let handle = match self.playback.open(&session.session_id, &spec) {
            Ok(handle) => handle,
            Err(e) => {
                warn!(session_id = %session.session_id, error = %e, "Playback open failed");
                self.release_resources(&mut session);
                return Err(RingError::acquisition(e.to_string()));
            }
        };

        if let Err(e) = self.playback.start_looping(&handle) {
            warn!(session_id = %session.session_id, error = %e, "Playback start failed");
            if let Err(e) = self.playback.release(&handle) {
                warn!(session_id = %session.session_id, error = %e, "Playback release failed");
            }
            self.release_resources(&mut session);
            return Err(RingError::acquisition(e.to_string()));
        }

        session.attach_playback(handle);
        let session_id = session.session_id.clone();

        info!(
            session_id = %session_id,
            source = ?session.audio_source,
            "Alarm ringing"
        );

        self.session = Some(session);

        Ok(StartOutcome::Started { session_id })
    }

    /// Handle a stop trigger.
    ///
    /// Releases playback first, then the notification. Release failures are
    /// logged and never propagate: after this returns, the manager holds no
    /// resources regardless of what the hosts reported.
    pub fn stop(&mut self) -> StopOutcome {
        let Some(mut session) = self.session.take() else {
            debug!("Stop with no active session, ignoring");
            return StopOutcome::NotRunning;
        };

        session.state = AlarmState::Stopping;
        self.release_resources(&mut session);

        info!(session_id = %session.session_id, "Alarm stopped");

        StopOutcome::Stopped {
            session_id: session.session_id,
        }
    }

    /// Refresh path for a start that arrives mid-session: update the note
    /// and re-show the notification, leaving playback untouched.
    fn refresh(
        notifier: &dyn NotificationHost,
        session: &mut AlarmSession,
        params: StartParams,
    ) -> StartOutcome {
        if params.note.is_some() {
            session.note = params.note;
        }
        if let Some(requested) = params.audio_source
            && session.audio_source.uri() != Some(requested.as_str())
        {
            debug!(
                session_id = %session.session_id,
                requested = %requested,
                "Ignoring new audio source while already ringing"
            );
        }

        match notifier.show(&Self::content(session.note.as_deref())) {
            Ok(handle) => session.notification = Some(handle),
            // Keep the previous notification; a failed refresh must not
            // disturb the ringing alarm.
            Err(e) => warn!(session_id = %session.session_id, error = %e, "Notification refresh failed"),
        }

        info!(session_id = %session.session_id, "Alarm already ringing, notification refreshed");

        StartOutcome::Refreshed {
            session_id: session.session_id.clone(),
        }
    }

    /// Shared cleanup: drop every handle the session still owns, logging
    /// host failures instead of propagating them. Used by `stop()` and by
    /// every failed-start path.
    fn release_resources(&self, session: &mut AlarmSession) {
        if let Some(handle) = session.playback.take() {
            if let Err(e) = self.playback.stop(&handle) {
                warn!(session_id = %session.session_id, error = %e, "Playback stop failed");
            }
            if let Err(e) = self.playback.release(&handle) {
                warn!(session_id = %session.session_id, error = %e, "Playback release failed");
            }
        }

        if let Some(handle) = session.notification.take() {
            if let Err(e) = self.notifier.cancel(&handle) {
                warn!(session_id = %session.session_id, error = %e, "Notification cancel failed");
            }
        }

        debug_assert!(!session.holds_resources());
    }

    fn content(note: Option<&str>) -> NotificationContent {
        NotificationContent {
            title: NOTIFICATION_TITLE.into(),
            text: note.unwrap_or(DEFAULT_NOTE).into(),
            sticky: true,
            stop_action: Some(STOP_ACTION_LABEL.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringd_host_api::{MockNotifier, MockPlayback, StreamIntent};

    fn make_manager() -> (AlarmManager, Arc<MockPlayback>, Arc<MockNotifier>) {
        let playback = Arc::new(MockPlayback::new());
        let notifier = Arc::new(MockNotifier::new());
        let manager = AlarmManager::new(
            playback.clone(),
            notifier.clone(),
            ChannelSpec::default(),
        );
        (manager, playback, notifier)
    }

    #[test]
    fn start_with_no_source_plays_default() {
        let (mut manager, playback, notifier) = make_manager();

        let outcome = manager.start(StartParams::default()).unwrap();
        assert!(matches!(outcome, StartOutcome::Started { .. }));
        assert_eq!(manager.state(), AlarmState::Playing);

        let streams = playback.looping_streams();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].spec.source, AudioSource::Default);
        assert_eq!(streams[0].spec.intent, StreamIntent::Alarm);

        let visible = notifier.visible().unwrap();
        assert_eq!(visible.text, DEFAULT_NOTE);
        assert!(visible.sticky);
        assert!(visible.stop_action.is_some());
    }

    #[test]
    fn start_with_source_uses_it() {
        let (mut manager, playback, _notifier) = make_manager();

        manager
            .start(StartParams {
                note: None,
                audio_source: Some("file:///tmp/tone.ogg".into()),
            })
            .unwrap();

        let streams = playback.looping_streams();
        assert_eq!(
            streams[0].spec.source,
            AudioSource::Uri {
                uri: "file:///tmp/tone.ogg".into()
            }
        );
    }

    #[test]
    fn duplicate_start_never_reopens_playback() {
        let (mut manager, playback, notifier) = make_manager();

        manager.start(StartParams::default()).unwrap();

        let outcome = manager
            .start(StartParams {
                note: Some("wake up".into()),
                audio_source: None,
            })
            .unwrap();

        assert!(matches!(outcome, StartOutcome::Refreshed { .. }));
        assert_eq!(manager.state(), AlarmState::Playing);

        // Exactly one open over both starts, notification text refreshed
        assert_eq!(playback.open_count(), 1);
        assert_eq!(playback.looping_streams().len(), 1);
        assert_eq!(notifier.visible().unwrap().text, "wake up");
    }

    #[test]
    fn refresh_without_note_keeps_existing_text() {
        let (mut manager, _playback, notifier) = make_manager();

        manager
            .start(StartParams {
                note: Some("wake up".into()),
                audio_source: None,
            })
            .unwrap();
        manager.start(StartParams::default()).unwrap();

        assert_eq!(notifier.visible().unwrap().text, "wake up");
    }

    #[test]
    fn stop_releases_everything() {
        let (mut manager, playback, notifier) = make_manager();

        manager.start(StartParams::default()).unwrap();
        let outcome = manager.stop();

        assert!(matches!(outcome, StopOutcome::Stopped { .. }));
        assert_eq!(manager.state(), AlarmState::Idle);
        assert!(playback.live_streams().is_empty());
        assert!(notifier.visible().is_none());
    }

    #[test]
    fn stop_when_idle_is_noop() {
        let (mut manager, _playback, _notifier) = make_manager();
        assert!(matches!(manager.stop(), StopOutcome::NotRunning));
    }

    #[test]
    fn open_failure_cancels_notification_and_returns_idle() {
        let (mut manager, playback, notifier) = make_manager();
        *playback.fail_open.lock().unwrap() = true;

        let err = manager.start(StartParams::default()).unwrap_err();
        assert!(matches!(err, RingError::ResourceAcquisition(_)));

        // No orphaned notification, no playback, back to idle
        assert_eq!(manager.state(), AlarmState::Idle);
        assert!(notifier.visible().is_none());
        assert!(playback.live_streams().is_empty());

        // Recoverable: the next start succeeds
        *playback.fail_open.lock().unwrap() = false;
        manager.start(StartParams::default()).unwrap();
        assert_eq!(manager.state(), AlarmState::Playing);
    }

    #[test]
    fn start_loop_failure_releases_partial_resources() {
        let (mut manager, playback, notifier) = make_manager();
        *playback.fail_start.lock().unwrap() = true;

        let err = manager.start(StartParams::default()).unwrap_err();
        assert!(matches!(err, RingError::ResourceAcquisition(_)));

        assert_eq!(manager.state(), AlarmState::Idle);
        assert!(playback.live_streams().is_empty());
        assert!(notifier.visible().is_none());
    }

    #[test]
    fn release_failures_still_leave_idle_with_nothing_held() {
        let (mut manager, playback, notifier) = make_manager();

        manager.start(StartParams::default()).unwrap();

        *playback.fail_stop.lock().unwrap() = true;
        *playback.fail_release.lock().unwrap() = true;
        *notifier.fail_cancel.lock().unwrap() = true;

        // Stop never errors; the session is gone even if the hosts failed
        assert!(matches!(manager.stop(), StopOutcome::Stopped { .. }));
        assert_eq!(manager.state(), AlarmState::Idle);
        assert!(manager.snapshot().session_id.is_none());

        // And the manager is usable again once the hosts recover
        *playback.fail_stop.lock().unwrap() = false;
        *playback.fail_release.lock().unwrap() = false;
        *notifier.fail_cancel.lock().unwrap() = false;
        manager.start(StartParams::default()).unwrap();
        assert_eq!(playback.open_count(), 2);
    }

    #[test]
    fn start_during_stopping_is_rejected() {
        let (mut manager, _playback, _notifier) = make_manager();

        manager.start(StartParams::default()).unwrap();
        manager.session.as_mut().unwrap().state = AlarmState::Stopping;

        let err = manager.start(StartParams::default()).unwrap_err();
        assert!(matches!(err, RingError::ConflictingTransition));
    }

    #[test]
    fn channel_registered_once_across_sessions() {
        let (mut manager, _playback, notifier) = make_manager();

        manager.start(StartParams::default()).unwrap();
        manager.stop();
        manager.start(StartParams::default()).unwrap();
        manager.stop();

        assert_eq!(notifier.channel_count(), 1);
        assert_eq!(notifier.ensure_calls(), 2);
    }

    #[test]
    fn refresh_failure_keeps_alarm_ringing() {
        let (mut manager, playback, notifier) = make_manager();

        manager.start(StartParams::default()).unwrap();
        *notifier.fail_show.lock().unwrap() = true;

        let outcome = manager
            .start(StartParams {
                note: Some("ignored".into()),
                audio_source: None,
            })
            .unwrap();

        assert!(matches!(outcome, StartOutcome::Refreshed { .. }));
        assert_eq!(manager.state(), AlarmState::Playing);
        assert_eq!(playback.looping_streams().len(), 1);
    }

    #[test]
    fn full_ring_refresh_stop_scenario() {
        let (mut manager, playback, notifier) = make_manager();

        // start({})
        manager.start(StartParams::default()).unwrap();
        assert_eq!(manager.state(), AlarmState::Playing);
        assert_eq!(notifier.show_calls(), 1);
        assert_eq!(playback.looping_streams()[0].spec.source, AudioSource::Default);

        // start({note: "wake up"})
        manager
            .start(StartParams {
                note: Some("wake up".into()),
                audio_source: None,
            })
            .unwrap();
        assert_eq!(manager.state(), AlarmState::Playing);
        assert_eq!(notifier.visible().unwrap().text, "wake up");
        assert_eq!(playback.open_count(), 1);

        // stop()
        manager.stop();
        assert_eq!(manager.state(), AlarmState::Idle);
        assert!(playback.live_streams().is_empty());
        assert!(notifier.visible().is_none());
    }
}

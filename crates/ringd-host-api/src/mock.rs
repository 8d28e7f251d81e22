//! Mock hosts for testing

use ringd_util::SessionId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    ChannelSpec, HostError, HostResult, NotificationContent, NotificationHandle,
    NotificationHost, NotificationPayload, PlaybackHandle, PlaybackHost, PlaybackPayload,
    PlaybackSpec,
};

/// Mock stream state for testing
#[derive(Debug, Clone)]
pub struct MockStream {
    pub session_id: SessionId,
    pub spec: PlaybackSpec,
    pub looping: bool,
    pub released: bool,
}

/// Mock playback host for unit/integration testing
pub struct MockPlayback {
    next_id: AtomicU64,
    streams: Arc<Mutex<HashMap<u64, MockStream>>>,
    opens: AtomicU64,

    /// Configure open to fail
    pub fail_open: Arc<Mutex<bool>>,

    /// Configure start_looping to fail
    pub fail_start: Arc<Mutex<bool>>,

    /// Configure stop to fail
    pub fail_stop: Arc<Mutex<bool>>,

    /// Configure release to fail
    pub fail_release: Arc<Mutex<bool>>,
}

impl MockPlayback {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            streams: Arc::new(Mutex::new(HashMap::new())),
            opens: AtomicU64::new(0),
            fail_open: Arc::new(Mutex::new(false)),
            fail_start: Arc::new(Mutex::new(false)),
            fail_stop: Arc::new(Mutex::new(false)),
            fail_release: Arc::new(Mutex::new(false)),
        }
    }

    /// Number of successful opens over the host's lifetime
    pub fn open_count(&self) -> u64 {
        self.opens.load(Ordering::SeqCst)
    }

    /// Streams that have been opened and not yet released
    pub fn live_streams(&self) -> Vec<MockStream> {
        self.streams
            .lock()
            .unwrap()
            .values()
            .filter(|s| !s.released)
            .cloned()
            .collect()
    }

    /// Streams currently looping
    pub fn looping_streams(&self) -> Vec<MockStream> {
        self.streams
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.looping && !s.released)
            .cloned()
            .collect()
    }

    fn mock_id(handle: &PlaybackHandle) -> HostResult<u64> {
        match handle.payload() {
            PlaybackPayload::Mock { id } => Ok(*id),
            _ => Err(HostError::UnknownHandle),
        }
    }
}

impl Default for MockPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackHost for MockPlayback {
    fn open(&self, session_id: &SessionId, spec: &PlaybackSpec) -> HostResult<PlaybackHandle> {
        if *self.fail_open.lock().unwrap() {
            return Err(HostError::OpenFailed("Mock open failure".into()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.streams.lock().unwrap().insert(
            id,
            MockStream {
                session_id: session_id.clone(),
                spec: spec.clone(),
                looping: false,
                released: false,
            },
        );
        self.opens.fetch_add(1, Ordering::SeqCst);

        Ok(PlaybackHandle::new(
            session_id.clone(),
            PlaybackPayload::Mock { id },
        ))
    }

    fn start_looping(&self, handle: &PlaybackHandle) -> HostResult<()> {
        if *self.fail_start.lock().unwrap() {
            return Err(HostError::StartFailed("Mock start failure".into()));
        }

        let id = Self::mock_id(handle)?;
        let mut streams = self.streams.lock().unwrap();
        match streams.get_mut(&id) {
            Some(stream) if !stream.released => {
                stream.looping = true;
                Ok(())
            }
            _ => Err(HostError::UnknownHandle),
        }
    }

    fn stop(&self, handle: &PlaybackHandle) -> HostResult<()> {
        if *self.fail_stop.lock().unwrap() {
            return Err(HostError::StopFailed("Mock stop failure".into()));
        }

        let id = Self::mock_id(handle)?;
        // Stopping an unknown or never-started stream is a no-op
        if let Some(stream) = self.streams.lock().unwrap().get_mut(&id) {
            stream.looping = false;
        }
        Ok(())
    }

    fn release(&self, handle: &PlaybackHandle) -> HostResult<()> {
        if *self.fail_release.lock().unwrap() {
            return Err(HostError::ReleaseFailed("Mock release failure".into()));
        }

        let id = Self::mock_id(handle)?;
        // Releasing twice, or a handle the host never saw, stays a no-op
        if let Some(stream) = self.streams.lock().unwrap().get_mut(&id) {
            stream.looping = false;
            stream.released = true;
        }
        Ok(())
    }
}

/// Internal notifier state, behind one lock
#[derive(Debug, Default)]
struct NotifierState {
    channels: Vec<ChannelSpec>,
    ensure_calls: u64,
    show_calls: u64,
    cancel_calls: u64,
    visible: Option<NotificationContent>,
}

/// Mock notification slot number
const MOCK_SLOT: u32 = 1;

/// Mock notification host for unit/integration testing
pub struct MockNotifier {
    state: Mutex<NotifierState>,

    /// Configure ensure_channel to fail
    pub fail_channel: Arc<Mutex<bool>>,

    /// Configure show to fail
    pub fail_show: Arc<Mutex<bool>>,

    /// Configure cancel to fail
    pub fail_cancel: Arc<Mutex<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(NotifierState::default()),
            fail_channel: Arc::new(Mutex::new(false)),
            fail_show: Arc::new(Mutex::new(false)),
            fail_cancel: Arc::new(Mutex::new(false)),
        }
    }

    /// The currently visible notification, if any
    pub fn visible(&self) -> Option<NotificationContent> {
        self.state.lock().unwrap().visible.clone()
    }

    /// Number of registered channels (distinct ids)
    pub fn channel_count(&self) -> usize {
        self.state.lock().unwrap().channels.len()
    }

    /// Total ensure_channel calls, including deduplicated repeats
    pub fn ensure_calls(&self) -> u64 {
        self.state.lock().unwrap().ensure_calls
    }

    /// Total show calls
    pub fn show_calls(&self) -> u64 {
        self.state.lock().unwrap().show_calls
    }

    /// Total cancel calls
    pub fn cancel_calls(&self) -> u64 {
        self.state.lock().unwrap().cancel_calls
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHost for MockNotifier {
    fn ensure_channel(&self, spec: &ChannelSpec) -> HostResult<()> {
        if *self.fail_channel.lock().unwrap() {
            return Err(HostError::ChannelFailed("Mock channel failure".into()));
        }

        let mut state = self.state.lock().unwrap();
        state.ensure_calls += 1;
        if !state.channels.iter().any(|c| c.id == spec.id) {
            state.channels.push(spec.clone());
        }
        Ok(())
    }

    fn show(&self, content: &NotificationContent) -> HostResult<NotificationHandle> {
        if *self.fail_show.lock().unwrap() {
            return Err(HostError::ShowFailed("Mock show failure".into()));
        }

        let mut state = self.state.lock().unwrap();
        state.show_calls += 1;
        // Replace, never stack
        state.visible = Some(content.clone());

        Ok(NotificationHandle::new(NotificationPayload::Mock {
            slot: MOCK_SLOT,
        }))
    }

    fn cancel(&self, _handle: &NotificationHandle) -> HostResult<()> {
        if *self.fail_cancel.lock().unwrap() {
            return Err(HostError::CancelFailed("Mock cancel failure".into()));
        }

        let mut state = self.state.lock().unwrap();
        state.cancel_calls += 1;
        state.visible = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AudioSource;

    #[test]
    fn mock_open_start_release() {
        let host = MockPlayback::new();
        let session_id = SessionId::new();

        let handle = host
            .open(&session_id, &PlaybackSpec::alarm(AudioSource::Default))
            .unwrap();

        assert_eq!(host.open_count(), 1);
        assert_eq!(host.live_streams().len(), 1);
        assert!(host.looping_streams().is_empty());

        host.start_looping(&handle).unwrap();
        assert_eq!(host.looping_streams().len(), 1);

        host.stop(&handle).unwrap();
        host.release(&handle).unwrap();
        assert!(host.live_streams().is_empty());

        // Idempotent release
        host.release(&handle).unwrap();
    }

    #[test]
    fn mock_open_failure() {
        let host = MockPlayback::new();
        *host.fail_open.lock().unwrap() = true;

        let result = host.open(&SessionId::new(), &PlaybackSpec::alarm(AudioSource::Default));
        assert!(result.is_err());
        assert_eq!(host.open_count(), 0);
    }

    #[test]
    fn stop_before_start_is_noop() {
        let host = MockPlayback::new();
        let handle = host
            .open(&SessionId::new(), &PlaybackSpec::alarm(AudioSource::Default))
            .unwrap();

        host.stop(&handle).unwrap();
        assert_eq!(host.live_streams().len(), 1);
    }

    #[test]
    fn channel_registration_is_idempotent() {
        let notifier = MockNotifier::new();
        let spec = ChannelSpec::default();

        notifier.ensure_channel(&spec).unwrap();
        notifier.ensure_channel(&spec).unwrap();
        notifier.ensure_channel(&spec).unwrap();

        assert_eq!(notifier.channel_count(), 1);
        assert_eq!(notifier.ensure_calls(), 3);
    }

    #[test]
    fn show_replaces_prior_notification() {
        let notifier = MockNotifier::new();

        let first = NotificationContent {
            title: "Alarm".into(),
            text: "first".into(),
            sticky: true,
            stop_action: Some("Stop".into()),
        };
        let second = NotificationContent {
            text: "second".into(),
            ..first.clone()
        };

        let handle = notifier.show(&first).unwrap();
        notifier.show(&second).unwrap();

        assert_eq!(notifier.visible().unwrap().text, "second");

        notifier.cancel(&handle).unwrap();
        assert!(notifier.visible().is_none());

        // Idempotent cancel
        notifier.cancel(&handle).unwrap();
    }
}

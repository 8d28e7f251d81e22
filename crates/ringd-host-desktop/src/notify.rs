//! Log-backed notification host
//!
//! Renders the persistent alarm notification into the structured log and
//! tracks channel registrations and the currently visible content. One
//! stable slot means repeated `show` calls replace rather than stack, the
//! same contract a platform status bar gives us.

use ringd_host_api::{
    ChannelSpec, HostResult, NotificationContent, NotificationHandle, NotificationHost,
    NotificationPayload,
};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{debug, info};

/// The single notification slot this host manages
const NOTIFICATION_SLOT: u32 = 1;

#[derive(Debug, Default)]
struct NotifierState {
    channels: HashSet<String>,
    visible: Option<NotificationContent>,
}

/// Notification host that writes to the tracing log
#[derive(Debug, Default)]
pub struct DesktopNotifier {
    state: Mutex<NotifierState>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible notification, if any
    pub fn visible(&self) -> Option<NotificationContent> {
        self.state.lock().unwrap().visible.clone()
    }
}

impl NotificationHost for DesktopNotifier {
    fn ensure_channel(&self, spec: &ChannelSpec) -> HostResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.channels.insert(spec.id.clone()) {
            info!(
                channel_id = %spec.id,
                name = %spec.name,
                importance = ?spec.importance,
                "Notification channel registered"
            );
        } else {
            debug!(channel_id = %spec.id, "Notification channel already registered");
        }
        Ok(())
    }

    fn show(&self, content: &NotificationContent) -> HostResult<NotificationHandle> {
        let mut state = self.state.lock().unwrap();
        let replacing = state.visible.is_some();
        state.visible = Some(content.clone());

        info!(
            title = %content.title,
            text = %content.text,
            sticky = content.sticky,
            stop_action = ?content.stop_action,
            replacing,
            "Notification shown"
        );

        Ok(NotificationHandle::new(NotificationPayload::Desktop {
            slot: NOTIFICATION_SLOT,
        }))
    }

    fn cancel(&self, _handle: &NotificationHandle) -> HostResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.visible.take().is_some() {
            info!("Notification cancelled");
        } else {
            debug!("Cancel with nothing visible, ignoring");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringd_host_api::ChannelImportance;

    fn content(text: &str) -> NotificationContent {
        NotificationContent {
            title: "Alarm".into(),
            text: text.into(),
            sticky: true,
            stop_action: Some("Stop".into()),
        }
    }

    #[test]
    fn show_replaces_and_cancel_clears() {
        let notifier = DesktopNotifier::new();

        let handle = notifier.show(&content("first")).unwrap();
        notifier.show(&content("second")).unwrap();
        assert_eq!(notifier.visible().unwrap().text, "second");

        notifier.cancel(&handle).unwrap();
        assert!(notifier.visible().is_none());

        // Idempotent
        notifier.cancel(&handle).unwrap();
    }

    #[test]
    fn repeated_channel_registration_is_noop() {
        let notifier = DesktopNotifier::new();
        let spec = ChannelSpec {
            id: "alarm_channel".into(),
            name: "Alarm".into(),
            importance: ChannelImportance::High,
        };

        notifier.ensure_channel(&spec).unwrap();
        notifier.ensure_channel(&spec).unwrap();

        assert_eq!(notifier.state.lock().unwrap().channels.len(), 1);
    }
}

//! Interactive trigger bridge
//!
//! Maps lines typed on stdin onto typed bridge commands. This is a local
//! trigger source for the session manager, not a wire protocol:
//!
//! ```text
//! start [@source] [note...]   ring the alarm / refresh the note
//! stop                        stop the alarm
//! status                      print the current state
//! quit                        stop and exit
//! ```

use ringd_api::{BridgeCommand, BridgeReply, StartParams};

/// One parsed line of bridge input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeInput {
    Command(BridgeCommand),
    Quit,
    Empty,
    Unknown(String),
}

/// Parse a line of input. A `start` argument beginning with `@` names the
/// audio source; everything after it is the note.
pub fn parse_line(line: &str) -> BridgeInput {
    let trimmed = line.trim();
    let Some((word, rest)) = split_word(trimmed) else {
        return BridgeInput::Empty;
    };

    match word {
        "start" => {
            let (audio_source, note) = match split_word(rest) {
                Some((source, note_rest)) if source.starts_with('@') => (
                    Some(source.trim_start_matches('@').to_string()),
                    non_empty(note_rest),
                ),
                _ => (None, non_empty(rest)),
            };
            BridgeInput::Command(BridgeCommand::Start(StartParams { note, audio_source }))
        }
        "stop" => BridgeInput::Command(BridgeCommand::Stop),
        "status" => BridgeInput::Command(BridgeCommand::Status),
        "quit" | "exit" => BridgeInput::Quit,
        other => BridgeInput::Unknown(other.to_string()),
    }
}

/// Render a reply for the terminal
pub fn render_reply(reply: &BridgeReply) -> String {
    match reply {
        BridgeReply::Started { session_id } => format!("alarm ringing (session {session_id})"),
        BridgeReply::Refreshed { session_id } => {
            format!("already ringing, notification refreshed (session {session_id})")
        }
        BridgeReply::Stopped { session_id } => format!("alarm stopped (session {session_id})"),
        BridgeReply::NotRunning => "no alarm is ringing".into(),
        BridgeReply::Status(snapshot) => match &snapshot.session_id {
            Some(session_id) => format!(
                "{:?}: session {session_id}, note {:?}, source {}",
                snapshot.state,
                snapshot.note.as_deref().unwrap_or("-"),
                snapshot.audio_source.as_deref().unwrap_or("default"),
            ),
            None => "Idle".into(),
        },
        BridgeReply::Error { code, message } => format!("error ({code:?}): {message}"),
    }
}

fn split_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim_start())),
        None => Some((s, "")),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

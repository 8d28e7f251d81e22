//! Rodio-backed playback host
//!
//! Rodio output streams are tied to the thread that opened them, so all sink
//! work happens on one worker thread that owns the stream and a map of live
//! sinks. Trait calls send a command and wait for the worker's reply, which
//! keeps the adapter `Send + Sync` without sharing the stream itself.

use ringd_host_api::{
    AudioSource, HostError, HostResult, PlaybackHandle, PlaybackHost, PlaybackPayload,
    PlaybackSpec, StreamIntent,
};
use ringd_util::SessionId;
use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info, warn};

/// Frequency of the built-in fallback tone
const DEFAULT_TONE_HZ: f32 = 880.0;

/// Commands sent to the audio worker thread
enum AudioCmd {
    Open {
        spec: PlaybackSpec,
        reply: mpsc::Sender<Result<u64, String>>,
    },
    Start {
        sink_id: u64,
        reply: mpsc::Sender<Result<(), String>>,
    },
    Stop {
        sink_id: u64,
        reply: mpsc::Sender<Result<(), String>>,
    },
    Release {
        sink_id: u64,
        reply: mpsc::Sender<Result<(), String>>,
    },
}

/// Playback host backed by a rodio output stream
pub struct DesktopPlayback {
    tx: mpsc::Sender<AudioCmd>,
}

impl DesktopPlayback {
    /// Spawn the audio worker. `alarm_volume` is the gain applied to
    /// alarm-intent streams, in `0.0..=1.0`.
    ///
    /// Opening the output device is deferred to the worker; if no device is
    /// available, every `open` fails and the rest of the capability set
    /// stays a no-op.
    pub fn new(alarm_volume: f32) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("ringd-audio".into())
            .spawn(move || audio_worker(rx, alarm_volume))
            .expect("failed to spawn audio worker thread");

        Self { tx }
    }

    fn request<T>(
        &self,
        cmd: AudioCmd,
        reply_rx: mpsc::Receiver<Result<T, String>>,
    ) -> Result<Result<T, String>, HostError> {
        self.tx
            .send(cmd)
            .map_err(|_| HostError::Internal("audio worker is gone".into()))?;
        reply_rx
            .recv()
            .map_err(|_| HostError::Internal("audio worker dropped the reply".into()))
    }

    fn sink_id(handle: &PlaybackHandle) -> HostResult<u64> {
        match handle.payload() {
            PlaybackPayload::Desktop { sink_id } => Ok(*sink_id),
            _ => Err(HostError::UnknownHandle),
        }
    }
}

impl PlaybackHost for DesktopPlayback {
    fn open(&self, session_id: &SessionId, spec: &PlaybackSpec) -> HostResult<PlaybackHandle> {
        let (reply_tx, reply_rx) = mpsc::channel();
        let result = self.request(
            AudioCmd::Open {
                spec: spec.clone(),
                reply: reply_tx,
            },
            reply_rx,
        )?;

        match result {
            Ok(sink_id) => {
                debug!(session_id = %session_id, sink_id, "Playback sink opened");
                Ok(PlaybackHandle::new(
                    session_id.clone(),
                    PlaybackPayload::Desktop { sink_id },
                ))
            }
            Err(e) => Err(HostError::OpenFailed(e)),
        }
    }

    fn start_looping(&self, handle: &PlaybackHandle) -> HostResult<()> {
        let sink_id = Self::sink_id(handle)?;
        let (reply_tx, reply_rx) = mpsc::channel();
        self.request(
            AudioCmd::Start {
                sink_id,
                reply: reply_tx,
            },
            reply_rx,
        )?
        .map_err(HostError::StartFailed)
    }

    fn stop(&self, handle: &PlaybackHandle) -> HostResult<()> {
        let sink_id = Self::sink_id(handle)?;
        let (reply_tx, reply_rx) = mpsc::channel();
        self.request(
            AudioCmd::Stop {
                sink_id,
                reply: reply_tx,
            },
            reply_rx,
        )?
        .map_err(HostError::StopFailed)
    }

    fn release(&self, handle: &PlaybackHandle) -> HostResult<()> {
        let sink_id = Self::sink_id(handle)?;
        let (reply_tx, reply_rx) = mpsc::channel();
        self.request(
            AudioCmd::Release {
                sink_id,
                reply: reply_tx,
            },
            reply_rx,
        )?
        .map_err(HostError::ReleaseFailed)
    }
}

/// Worker loop owning the output stream and all live sinks
fn audio_worker(rx: mpsc::Receiver<AudioCmd>, alarm_volume: f32) {
    let stream = match OutputStreamBuilder::open_default_stream() {
        Ok(stream) => {
            info!("Audio output stream opened");
            Some(stream)
        }
        Err(e) => {
            warn!(error = %e, "No audio output stream, playback unavailable");
            None
        }
    };

    let mut sinks: HashMap<u64, Sink> = HashMap::new();
    let mut next_id: u64 = 1;

    while let Ok(cmd) = rx.recv() {
        match cmd {
            AudioCmd::Open { spec, reply } => {
                let result = match &stream {
                    Some(stream) => open_sink(stream, &spec, alarm_volume).map(|sink| {
                        let id = next_id;
                        next_id += 1;
                        sinks.insert(id, sink);
                        id
                    }),
                    None => Err("no audio output stream".into()),
                };
                let _ = reply.send(result);
            }

            AudioCmd::Start { sink_id, reply } => {
                let result = match sinks.get(&sink_id) {
                    Some(sink) => {
                        sink.play();
                        Ok(())
                    }
                    None => Err(format!("unknown sink {sink_id}")),
                };
                let _ = reply.send(result);
            }

            AudioCmd::Stop { sink_id, reply } => {
                // Stopping an unknown or never-started sink is a no-op
                if let Some(sink) = sinks.get(&sink_id) {
                    sink.pause();
                }
                let _ = reply.send(Ok(()));
            }

            AudioCmd::Release { sink_id, reply } => {
                // Idempotent: releasing twice just misses the map
                if let Some(sink) = sinks.remove(&sink_id) {
                    sink.stop();
                }
                let _ = reply.send(Ok(()));
            }
        }
    }
}

/// Build a paused sink with an infinitely looping source attached
fn open_sink(stream: &OutputStream, spec: &PlaybackSpec, alarm_volume: f32) -> Result<Sink, String> {
    let sink = Sink::connect_new(stream.mixer());
    sink.pause();
    sink.set_volume(stream_gain(spec.intent, alarm_volume));

    match &spec.source {
        AudioSource::Default => {
            sink.append(SineWave::new(DEFAULT_TONE_HZ));
        }
        AudioSource::Uri { uri } => {
            let path = local_path(uri);
            let file =
                File::open(path).map_err(|e| format!("cannot open audio source {uri}: {e}"))?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| format!("cannot decode audio source {uri}: {e}"))?;
            sink.append(source.repeat_infinite());
        }
    }

    Ok(sink)
}

/// Map a stream intent onto a sink gain. Alarm streams always get the
/// configured alarm volume, independent of any media attenuation.
fn stream_gain(intent: StreamIntent, alarm_volume: f32) -> f32 {
    match intent {
        StreamIntent::Alarm => alarm_volume.clamp(0.0, 1.0),
        StreamIntent::Media => 1.0,
    }
}

/// Resolve a URI-like reference onto a filesystem path
fn local_path(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}

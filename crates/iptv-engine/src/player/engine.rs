use serde::Serialize;
use tokio::sync::mpsc;

use crate::PlaybackError;

pub type SessionId = u64;

/// MIME type a sink is asked about before falling back to native playback.
pub const HLS_MIME: &str = "application/vnd.apple.mpegurl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorKind {
    /// Manifest or segment transport failed. Recovered by reloading.
    Network,
    /// Decode pipeline failed. Recovered in place.
    Media,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind:?} error: {details}")]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub fatal: bool,
    pub details: String,
}

impl EngineError {
    pub fn fatal(kind: EngineErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            fatal: true,
            details: details.into(),
        }
    }

    pub fn non_fatal(kind: EngineErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            fatal: false,
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Engine finished parsing the stream manifest.
    ManifestParsed,
    /// Engine is delivering media again.
    Progress,
    /// Sink has metadata for a natively played source.
    MetadataLoaded,
    Error(EngineError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvent {
    pub session: SessionId,
    pub event: PlayerEvent,
}

/// Handle given to an engine or sink to report events for one session.
#[derive(Debug, Clone)]
pub struct SessionNotifier {
    session: SessionId,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionNotifier {
    pub(crate) fn new(session: SessionId, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Queues `event`. Returns false once the controller is gone.
    pub fn notify(&self, event: PlayerEvent) -> bool {
        self.tx
            .send(SessionEvent {
                session: self.session,
                event,
            })
            .is_ok()
    }
}

/// Output surface the controller plays into.
pub trait MediaSink {
    /// Whether the sink can play `mime` without an engine.
    fn can_play_natively(&self, mime: &str) -> bool;

    /// Native playback: the sink loads `url` itself and reports
    /// [`PlayerEvent::MetadataLoaded`] through `notifier`.
    fn set_source(&mut self, url: &str, notifier: SessionNotifier);

    fn clear_source(&mut self);

    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);
}

/// External adaptive-streaming engine bound to one session.
pub trait StreamEngine {
    fn load(&mut self, url: &str);

    fn attach(&mut self, sink: &mut dyn MediaSink);

    /// Restart loading the current target after a network failure.
    fn reload(&mut self);

    /// Rebuild the decode pipeline without dropping the network session.
    fn recover_media(&mut self);

    /// Release every resource held by the engine. Called exactly once.
    fn destroy(&mut self);
}

pub trait EngineFactory {
    type Engine: StreamEngine;

    /// Whether the engine can run in this environment at all.
    fn is_supported(&self) -> bool;

    fn create(&self, notifier: SessionNotifier) -> Self::Engine;
}

//! Adaptive-stream playback.
//!
//! The [`PlaybackController`] owns at most one [`StreamEngine`] and one
//! [`MediaSink`]. Engines and sinks never call back into the controller;
//! they report through a [`SessionNotifier`] and the controller drains the
//! queue one event at a time.

mod controller;
mod engine;
pub mod probe;

pub use controller::{PlaybackController, PlaybackSession, PlaybackState};
pub use engine::{
    EngineError, EngineErrorKind, EngineFactory, HLS_MIME, MediaSink, PlayerEvent, SessionEvent,
    SessionId, SessionNotifier, StreamEngine,
};
pub use probe::{ManifestProbeEngine, ManifestProbeFactory};

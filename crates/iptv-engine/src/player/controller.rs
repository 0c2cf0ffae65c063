use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use super::engine::{
    EngineError, EngineErrorKind, EngineFactory, HLS_MIME, MediaSink, PlayerEvent, SessionEvent,
    SessionId, SessionNotifier, StreamEngine,
};
use crate::PlayerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Attaching,
    Playing,
    Recovering,
    Failed,
}

/// Read-only snapshot of the current session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSession {
    pub session: Option<SessionId>,
    pub target_url: Option<String>,
    pub state: PlaybackState,
    /// True until playback was actually started, and after a blocked autoplay.
    pub paused: bool,
    pub native: bool,
    pub recovery_attempts: u32,
    pub last_error: Option<EngineError>,
}

enum Backend<E> {
    Engine(E),
    Native,
}

/// Playback state machine for one selection at a time.
pub struct PlaybackController<F: EngineFactory, S: MediaSink> {
    factory: F,
    sink: S,
    config: PlayerConfig,

    backend: Option<Backend<F::Engine>>,
    current: Option<SessionId>,
    last_session: SessionId,
    target_url: Option<String>,
    state: PlaybackState,
    paused: bool,
    recovery_attempts: u32,
    last_error: Option<EngineError>,

    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<F: EngineFactory, S: MediaSink> PlaybackController<F, S> {
    pub fn new(factory: F, sink: S, config: PlayerConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            factory,
            sink,
            config,
            backend: None,
            current: None,
            last_session: 0,
            target_url: None,
            state: PlaybackState::Idle,
            paused: true,
            recovery_attempts: 0,
            last_error: None,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn session(&self) -> PlaybackSession {
        PlaybackSession {
            session: self.current,
            target_url: self.target_url.clone(),
            state: self.state,
            paused: self.paused,
            native: matches!(self.backend, Some(Backend::Native)),
            recovery_attempts: self.recovery_attempts,
            last_error: self.last_error.clone(),
        }
    }

    /// Starts a new session for `url`. Any previous engine is destroyed before
    /// the new one is created.
    pub fn select(&mut self, url: impl Into<String>) -> SessionId {
        let url = url.into();
        self.reset();

        self.last_session += 1;
        let session = self.last_session;
        self.current = Some(session);
        let notifier = SessionNotifier::new(session, self.events_tx.clone());

        if self.factory.is_supported() {
            let mut engine = self.factory.create(notifier);
            engine.load(&url);
            engine.attach(&mut self.sink);
            self.backend = Some(Backend::Engine(engine));
            self.state = PlaybackState::Attaching;
            info!(session, url = %url, "Attaching stream engine");
        } else if self.sink.can_play_natively(HLS_MIME) {
            self.sink.set_source(&url, notifier);
            self.backend = Some(Backend::Native);
            self.state = PlaybackState::Attaching;
            info!(session, url = %url, "Engine unsupported, using native playback");
        } else {
            warn!(session, url = %url, "No playback path available");
            self.last_error = Some(EngineError::fatal(
                EngineErrorKind::Other,
                "neither the stream engine nor the sink can play this stream",
            ));
            self.state = PlaybackState::Failed;
        }

        self.target_url = Some(url);
        session
    }

    /// Tears down the current session and returns to `Idle`.
    pub fn close(&mut self) {
        if let Some(session) = self.current {
            debug!(session, "Closing player");
        }
        self.reset();
    }

    /// Drains queued events without waiting. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Waits for the next event and handles it.
    ///
    /// The controller keeps its own sender, so this stays pending until some
    /// engine or sink emits. Bound it with a timeout when nothing may come.
    pub async fn process_next(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle(event);
        }
    }

    pub fn handle(&mut self, event: SessionEvent) {
        if self.current != Some(event.session) || self.backend.is_none() {
            trace!(session = event.session, "Dropping event for inactive session");
            return;
        }
        let session = event.session;
        let native = matches!(self.backend, Some(Backend::Native));

        match event.event {
            PlayerEvent::ManifestParsed if !native => self.on_ready(session),
            PlayerEvent::MetadataLoaded if native => self.on_ready(session),
            PlayerEvent::Progress => {
                if self.state == PlaybackState::Recovering {
                    info!(session, attempts = self.recovery_attempts, "Playback recovered");
                    self.state = PlaybackState::Playing;
                    self.recovery_attempts = 0;
                }
            }
            PlayerEvent::Error(err) => self.on_error(session, err),
            other => trace!(session, event = ?other, "Ignoring event for other backend"),
        }
    }

    fn on_ready(&mut self, session: SessionId) {
        let first = self.state == PlaybackState::Attaching;
        self.state = PlaybackState::Playing;
        self.recovery_attempts = 0;

        if first && self.config.autoplay {
            match self.sink.play() {
                Ok(()) => {
                    self.paused = false;
                    debug!(session, "Autoplay started");
                }
                Err(e) => {
                    self.paused = true;
                    info!(session, error = %e, "Autoplay blocked, staying paused");
                }
            }
        }
    }

    fn on_error(&mut self, session: SessionId, err: EngineError) {
        if !err.fatal {
            debug!(session, error = %err, "Ignoring non-fatal engine error");
            return;
        }

        let kind = err.kind;
        self.last_error = Some(err);

        let recoverable = matches!(kind, EngineErrorKind::Network | EngineErrorKind::Media)
            && matches!(self.backend, Some(Backend::Engine(_)));
        if !recoverable {
            error!(session, ?kind, "Unrecoverable playback error");
            self.fail();
            return;
        }

        self.recovery_attempts += 1;
        if self
            .config
            .max_recovery_attempts
            .is_some_and(|max| self.recovery_attempts > max)
        {
            error!(session, attempts = self.recovery_attempts, ?kind, "Recovery limit reached");
            self.fail();
            return;
        }

        warn!(session, attempt = self.recovery_attempts, ?kind, "Recovering from fatal engine error");
        if let Some(Backend::Engine(engine)) = &mut self.backend {
            match kind {
                EngineErrorKind::Network => engine.reload(),
                _ => engine.recover_media(),
            }
        }
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Recovering;
        }
    }

    fn fail(&mut self) {
        self.release();
        self.state = PlaybackState::Failed;
    }

    fn reset(&mut self) {
        self.release();
        self.current = None;
        self.target_url = None;
        self.state = PlaybackState::Idle;
        self.paused = true;
        self.recovery_attempts = 0;
        self.last_error = None;
    }

    fn release(&mut self) {
        match self.backend.take() {
            Some(Backend::Engine(mut engine)) => {
                engine.destroy();
                self.sink.clear_source();
                debug!(session = ?self.current, "Stream engine released");
            }
            Some(Backend::Native) => self.sink.clear_source(),
            None => {}
        }
    }
}

impl<F: EngineFactory, S: MediaSink> Drop for PlaybackController<F, S> {
    fn drop(&mut self) {
        self.release();
    }
}

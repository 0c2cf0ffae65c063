use iptv_engine::{MediaSink, PlaybackError, SessionNotifier};
use tracing::{debug, info};

/// Media sink for a terminal: nothing is rendered, calls are only logged.
///
/// It never plays natively, so every stream goes through the engine and
/// `set_source` is not reached in practice.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl MediaSink for ConsoleSink {
    fn can_play_natively(&self, _mime: &str) -> bool {
        false
    }

    fn set_source(&mut self, url: &str, _notifier: SessionNotifier) {
        debug!(url = %url, "Sink source set");
    }

    fn clear_source(&mut self) {
        debug!("Sink cleared");
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        info!("Stream ready");
        Ok(())
    }

    fn pause(&mut self) {
        debug!("Sink paused");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iptv_engine::player::HLS_MIME;
    use iptv_engine::{EngineFactory, PlaybackController, PlaybackState, PlayerConfig, StreamEngine};

    struct NoEngine;

    impl StreamEngine for NoEngine {
        fn load(&mut self, _url: &str) {}
        fn attach(&mut self, _sink: &mut dyn MediaSink) {}
        fn reload(&mut self) {}
        fn recover_media(&mut self) {}
        fn destroy(&mut self) {}
    }

    struct Unsupported;

    impl EngineFactory for Unsupported {
        type Engine = NoEngine;
        fn is_supported(&self) -> bool {
            false
        }
        fn create(&self, _notifier: SessionNotifier) -> NoEngine {
            NoEngine
        }
    }

    #[test]
    fn console_sink_only_plays_through_engine() {
        let mut sink = ConsoleSink;
        assert!(!sink.can_play_natively(HLS_MIME));
        assert!(sink.play().is_ok());

        let mut player = PlaybackController::new(Unsupported, ConsoleSink, PlayerConfig::default());
        player.select("http://s/live.m3u8");
        assert_eq!(player.state(), PlaybackState::Failed);
        player.close();
        assert_eq!(player.state(), PlaybackState::Idle);
    }
}

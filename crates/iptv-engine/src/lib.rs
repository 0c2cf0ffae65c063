//! # iptv-engine
//!
//! Core of the IPTV browser: fetches playlist documents from unreliable
//! third-party hosts, merges them into a deduplicated catalog, derives
//! filtered and paged views, and drives an adaptive-stream playback session
//! with error recovery.
//!
//! ## Components
//!
//! - [`fetcher`]: direct retrieval with a single passthrough-proxy fallback
//! - [`aggregator`]: concurrent multi-source loads, last request wins
//! - [`view`]: pure filter/paginate over a published [`Catalog`]
//! - [`player`]: playback state machine over an external streaming engine
//! - [`store`]: saved `{name, url}` sources
//! - [`browser`]: application state and the inbound command surface

pub mod aggregator;
pub mod browser;
pub mod builder;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod player;
pub mod presets;
pub mod proxy;
pub mod store;
pub mod view;

pub use aggregator::{Aggregator, LoadOutcome};
pub use browser::{AppState, Browser};
pub use builder::FetcherConfigBuilder;
pub use catalog::{Catalog, SourceSpec};
pub use client::create_client;
pub use config::{FetcherConfig, PlayerConfig, ViewConfig};
pub use error::{FetchError, PlaybackError, StoreError};
pub use fetcher::{HttpFetcher, PlaylistFetcher};
pub use player::{
    EngineError, EngineErrorKind, EngineFactory, MediaSink, PlaybackController, PlaybackSession,
    PlaybackState, PlayerEvent, SessionNotifier, StreamEngine,
};
pub use proxy::{ProxyAuth, ProxyConfig, ProxyType};
pub use store::{JsonFileStore, MemoryStore, SavedSource, SourceStore};
pub use view::{GroupFilter, PageItem, PageView, Query, view};

pub use m3u::{DEFAULT_GROUP, PlaylistEntry};

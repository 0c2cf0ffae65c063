//! # m3u
//!
//! Parser for extended M3U channel playlists, the line-oriented format used by
//! public IPTV indexes:
//!
//! ```text
//! #EXTM3U
//! #EXTINF:-1 tvg-id="France2.fr" tvg-logo="https://x/logo.png" group-title="General",France 2
//! https://example.com/france2/index.m3u8
//! ```
//!
//! Parsing is tolerant: incomplete records are skipped and never abort the
//! document. The parser does no I/O.

pub mod entry;
pub mod extinf;
pub mod parser;

pub use entry::{DEFAULT_GROUP, PlaylistEntry};
pub use extinf::{ExtInf, parse_extinf};
pub use parser::{ParseSkip, parse};

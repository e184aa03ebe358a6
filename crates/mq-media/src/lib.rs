//! mq-media: the byte-range streaming engine and subtitle transcoding.
//!
//! Everything in this crate is synchronous and free of HTTP types; the
//! server crate bridges it onto the async response body.
//!
//! # Modules
//!
//! - [`range`] - `Range` header resolution against a resource length
//! - [`chunks`] - Lazy, bounded-chunk file reader for a byte range
//! - [`subtitle`] - SubRip to WebVTT conversion and format dispatch
//! - [`mime`] - Content-type inference from file extensions

pub mod chunks;
pub mod mime;
pub mod range;
pub mod subtitle;

// Re-export commonly used items at the crate root.
pub use chunks::{ChunkSequence, ChunkStreamer};
pub use mime::guess_content_type;
pub use range::{resolve, ByteRange, ResolvedRange};
pub use subtitle::{load_subtitle, srt_to_webvtt, SubtitleFormat, SubtitlePayload};

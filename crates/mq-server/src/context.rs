//! Application context shared across route handlers via Axum state.
//!
//! Holds only immutable, cheaply clonable data. Requests never share file
//! handles or cursors, so no locking is needed here.

use std::sync::Arc;

use mq_core::config::Config;
use mq_media::ChunkStreamer;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Opens per-request chunk sequences with the configured chunk size.
    pub streamer: ChunkStreamer,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        let streamer = ChunkStreamer::new(&config.streaming);
        Self {
            config: Arc::new(config),
            streamer,
        }
    }
}

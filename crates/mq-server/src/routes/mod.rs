//! Route handlers for the HTTP API.

pub mod catalog;
pub mod health;
pub mod subtitles;
pub mod video;

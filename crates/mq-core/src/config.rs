//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML. Every section
//! defaults sensibly so an empty file is valid. Configuration is passed
//! explicitly to the components that need it; nothing here is global.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Locations searched when no config path is given on the command line.
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "./marquee.toml",
    "~/.config/marquee/config.toml",
    "/etc/marquee/config.toml",
];

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub streaming: StreamingConfig,
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`Config::load_or_default`], a missing or malformed file is an
    /// error here: the caller asked for this file specifically.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from `path`, or from the first default location
    /// that exists, falling back to defaults if nothing is found.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(candidate);
            let candidate = Path::new(expanded.as_ref());
            if candidate.exists() {
                tracing::info!("Loading config from {}", candidate.display());
                return Self::load(candidate);
            }
        }

        tracing::info!("No config file found; using defaults");
        Ok(Self::default())
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.streaming.chunk_size == 0 {
            warnings.push(format!(
                "streaming.chunk_size is 0; using {DEFAULT_CHUNK_SIZE}"
            ));
        }

        if self.library.video_extensions.is_empty() {
            warnings.push("library.video_extensions is empty; no videos will be listed".into());
        }

        for ext in self
            .library
            .video_extensions
            .iter()
            .chain(&self.library.subtitle_extensions)
        {
            if ext.starts_with('.') {
                warnings.push(format!(
                    "extension '{ext}' should be given without a leading dot"
                ));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the web UI build; served as the router fallback.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            static_dir: Some(PathBuf::from("static")),
        }
    }
}

/// Media library location and file classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub root: PathBuf,
    /// Video extensions, lowercase, without the leading dot.
    pub video_extensions: Vec<String>,
    /// Subtitle extensions in pairing preference order.
    pub subtitle_extensions: Vec<String>,
    /// Create the root directory at startup if it is missing.
    pub create_root: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Movies"),
            video_extensions: ["mp4", "mkv", "avi", "mov", "webm"]
                .into_iter()
                .map(String::from)
                .collect(),
            subtitle_extensions: ["srt", "vtt"].into_iter().map(String::from).collect(),
            create_root: true,
        }
    }
}

impl LibraryConfig {
    pub fn is_video(&self, path: &Path) -> bool {
        has_extension(path, &self.video_extensions)
    }

    pub fn is_subtitle(&self, path: &Path) -> bool {
        has_extension(path, &self.subtitle_extensions)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Chunk size used when none (or zero) is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Streaming and subtitle delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Upper bound for a single body chunk read from disk, in bytes.
    pub chunk_size: usize,
    /// Chunks buffered between the disk reader and the socket writer.
    pub channel_capacity: usize,
    /// `max-age` sent with converted subtitles.
    pub subtitle_cache_max_age_secs: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            channel_capacity: 4,
            subtitle_cache_max_age_secs: 3600,
        }
    }
}

impl StreamingConfig {
    /// Configured chunk size, with zero treated as the default.
    pub fn effective_chunk_size(&self) -> usize {
        if self.chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            self.chunk_size
        }
    }
}

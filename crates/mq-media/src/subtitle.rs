//! Subtitle delivery: SubRip to WebVTT conversion and format dispatch.
//!
//! Conversion is line- and token-pattern substitution rather than a cue
//! parser. Any line holding only digits is treated as a cue index and
//! removed, and every `HH:MM:SS,mmm` timecode gets a period instead of the
//! comma. Period-delimited timecodes are left alone, so converting an
//! already converted document does not mangle it.

use std::path::Path;
use std::sync::LazyLock;

use mq_core::{Error, Result};

/// Lines consisting only of a number (SubRip cue indices).
static CUE_INDEX_LINE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?m)^\s*\d+\s*$").expect("valid cue index pattern"));

/// SubRip timecode with comma-separated milliseconds.
static SRT_TIMECODE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(\d{2}:\d{2}:\d{2}),(\d{3})").expect("valid timecode pattern")
});

const BOM: char = '\u{feff}';

pub const WEBVTT_CONTENT_TYPE: &str = "text/vtt";
/// Converted output is always UTF-8.
pub const WEBVTT_UTF8_CONTENT_TYPE: &str = "text/vtt; charset=utf-8";
pub const PLAIN_CONTENT_TYPE: &str = "text/plain";

/// Convert SubRip text to a complete WebVTT document.
pub fn srt_to_webvtt(source: &str) -> String {
    let text = source.trim_start_matches(BOM);
    let without_indices = CUE_INDEX_LINE.replace_all(text, "");
    let body = SRT_TIMECODE.replace_all(&without_indices, "${1}.${2}");
    format!("WEBVTT\n\n{}\n", body.trim())
}

/// Subtitle source format, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    SubRip,
    WebVtt,
    Other,
}

impl SubtitleFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("srt") => SubtitleFormat::SubRip,
            Some("vtt") => SubtitleFormat::WebVtt,
            _ => SubtitleFormat::Other,
        }
    }
}

/// What to send back for a subtitle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitlePayload {
    /// File bytes served unchanged.
    Verbatim {
        content_type: &'static str,
        bytes: Vec<u8>,
    },
    /// SubRip converted in memory.
    Converted {
        /// Suggested download name, `<stem>.vtt`.
        file_name: String,
        webvtt: String,
    },
}

impl SubtitlePayload {
    pub fn content_type(&self) -> &'static str {
        match self {
            SubtitlePayload::Verbatim { content_type, .. } => content_type,
            SubtitlePayload::Converted { .. } => WEBVTT_UTF8_CONTENT_TYPE,
        }
    }
}

/// Read a subtitle file and prepare it for delivery.
///
/// A missing file is [`Error::NotFound`]; a file that exists but cannot be
/// read is [`Error::ReadFailure`]. Nothing is returned unless the whole
/// file was read, so callers never see a partial document.
pub fn load_subtitle(path: &Path) -> Result<SubtitlePayload> {
    if !path.is_file() {
        return Err(Error::not_found("subtitle", path.display()));
    }

    let format = SubtitleFormat::from_path(path);
    let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;

    Ok(match format {
        SubtitleFormat::WebVtt => SubtitlePayload::Verbatim {
            content_type: WEBVTT_CONTENT_TYPE,
            bytes,
        },
        SubtitleFormat::Other => SubtitlePayload::Verbatim {
            content_type: PLAIN_CONTENT_TYPE,
            bytes,
        },
        SubtitleFormat::SubRip => {
            // Invalid UTF-8 is replaced rather than rejected.
            let text = String::from_utf8_lossy(&bytes);
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "subtitle".into());
            SubtitlePayload::Converted {
                file_name: format!("{stem}.vtt"),
                webvtt: srt_to_webvtt(&text),
            }
        }
    })
}

/// Classify a failed subtitle read. A file that vanished after the existence
/// check is still a 404; anything else is a read failure.
fn read_error(path: &Path, e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::NotFound => Error::not_found("subtitle", path.display()),
        _ => Error::read_failure(path, e),
    }
}

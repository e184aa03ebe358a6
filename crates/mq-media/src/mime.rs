//! Content-type guessing for streamed files.

use std::path::Path;

/// Fallback for video files with an extension we do not know.
pub const DEFAULT_VIDEO_TYPE: &str = "video/mp4";

/// Guess the MIME type from a file's extension.
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "webm" => "video/webm",
        "ts" => "video/mp2t",
        "mov" => "video/quicktime",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        _ => DEFAULT_VIDEO_TYPE,
    }
}

//! Subtitle delivery route.
//!
//! `.vtt` files go out untouched, `.srt` files are converted to WebVTT in
//! memory, anything else is sent as plain text.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use mq_core::GroupKey;
use mq_media::SubtitlePayload;

use crate::context::AppContext;
use crate::error::AppError;
use crate::paths::resolve_asset_path;

/// GET /subtitle/{group}/{filename}
pub async fn get_subtitle(
    State(ctx): State<AppContext>,
    Path((group, filename)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let group = GroupKey::from_segment(&group);
    let path = resolve_asset_path(&ctx.config.library.root, &group, &filename, "subtitle")?;

    let payload = tokio::task::spawn_blocking(move || mq_media::load_subtitle(&path))
        .await
        .map_err(|e| mq_core::Error::Internal(format!("spawn_blocking join error: {e}")))??;

    let content_type = payload.content_type();
    let response = match payload {
        SubtitlePayload::Verbatim { bytes, .. } => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        SubtitlePayload::Converted { file_name, webvtt } => {
            tracing::debug!(file_name = %file_name, "Converted SubRip to WebVTT");
            let max_age = ctx.config.streaming.subtitle_cache_max_age_secs;
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("inline; filename=\"{}\"", file_name.replace('"', "")),
                    ),
                    (header::CACHE_CONTROL, format!("public, max-age={max_age}")),
                ],
                webvtt,
            )
                .into_response()
        }
    };

    Ok(response)
}

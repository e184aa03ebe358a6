//! Range-aware video streaming.
//!
//! The body is never buffered in full. A blocking task drains a
//! [`ChunkSequence`] into a small bounded channel that backs the response
//! body. When the client goes away the receiver is dropped, the next send
//! fails, and the task closes the sequence, releasing the file handle.

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use mq_core::GroupKey;
use mq_media::{ChunkSequence, ChunkStreamer, ResolvedRange};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::context::AppContext;
use crate::error::AppError;
use crate::paths::resolve_asset_path;

/// GET /video/{group}/{filename}
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path((group, filename)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let group = GroupKey::from_segment(&group);
    let file_path = resolve_asset_path(&ctx.config.library.root, &group, &filename, "video")?;

    let range_header = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_owned());

    Ok(serve_file_streaming(&ctx, file_path, range_header).await?)
}

/// Serve `file_path` honouring an optional `Range` header value.
pub async fn serve_file_streaming(
    ctx: &AppContext,
    file_path: PathBuf,
    range_header: Option<String>,
) -> mq_core::Result<Response> {
    let streamer = ctx.streamer;
    let content_type = mq_media::guess_content_type(&file_path);

    let (resolved, total_size, sequence) =
        tokio::task::spawn_blocking(move || open_for_range(&streamer, &file_path, range_header))
            .await
            .map_err(|e| mq_core::Error::Internal(format!("spawn_blocking join error: {e}")))??;

    let capacity = ctx.config.streaming.channel_capacity;

    let response = match (resolved, sequence) {
        (ResolvedRange::Partial(range), Some(sequence)) => {
            tracing::debug!(
                start = range.start(),
                end = range.end(),
                total_size,
                "Serving partial content"
            );
            (
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (header::CONTENT_RANGE, range.content_range()),
                    (header::CONTENT_LENGTH, range.length().to_string()),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                chunk_body(sequence, capacity),
            )
                .into_response()
        }
        (ResolvedRange::Full, Some(sequence)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (header::CONTENT_LENGTH, total_size.to_string()),
                (header::ACCEPT_RANGES, "bytes".to_string()),
            ],
            chunk_body(sequence, capacity),
        )
            .into_response(),
        _ => {
            tracing::debug!(total_size, "Range not satisfiable");
            (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [
                    (
                        header::CONTENT_RANGE,
                        ResolvedRange::unsatisfied_content_range(total_size),
                    ),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                Body::empty(),
            )
                .into_response()
        }
    };

    Ok(response)
}

/// Stat the file, resolve the range, and open a sequence when there is
/// something to send. Runs on a blocking thread.
fn open_for_range(
    streamer: &ChunkStreamer,
    file_path: &std::path::Path,
    range_header: Option<String>,
) -> mq_core::Result<(ResolvedRange, u64, Option<ChunkSequence>)> {
    let metadata = std::fs::metadata(file_path)
        .map_err(|_| mq_core::Error::not_found("video", file_path.display()))?;
    if !metadata.is_file() {
        return Err(mq_core::Error::not_found("video", file_path.display()));
    }
    let total_size = metadata.len();

    let resolved = mq_media::resolve(range_header.as_deref(), total_size);
    let sequence = match &resolved {
        ResolvedRange::Full => Some(streamer.open_full(file_path, total_size)?),
        ResolvedRange::Partial(range) => Some(streamer.open(file_path, range)?),
        ResolvedRange::Unsatisfiable { .. } => None,
    };

    Ok((resolved, total_size, sequence))
}

/// Bridge a blocking chunk sequence onto a streaming response body.
fn chunk_body(sequence: ChunkSequence, capacity: usize) -> Body {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    tokio::task::spawn_blocking(move || pump_chunks(sequence, tx));
    Body::from_stream(ReceiverStream::new(rx))
}

fn pump_chunks(mut sequence: ChunkSequence, tx: mpsc::Sender<std::io::Result<Bytes>>) {
    while let Some(chunk) = sequence.next() {
        if tx.blocking_send(chunk).is_err() {
            // Client disconnected; not an application error.
            tracing::trace!(remaining = sequence.remaining(), "Stream aborted by client");
            sequence.close();
            return;
        }
    }
}

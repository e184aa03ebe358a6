//! Catalog listing.

use axum::extract::State;
use axum::Json;
use mq_core::AssetDescriptor;

use crate::context::AppContext;
use crate::error::AppError;
use crate::scanner;

/// GET /api/movies: rescan the library and list its assets by title.
pub async fn list_movies(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<AssetDescriptor>>, AppError> {
    let config = ctx.config.clone();
    let assets = tokio::task::spawn_blocking(move || scanner::scan_library(&config.library))
        .await
        .map_err(|e| mq_core::Error::Internal(format!("spawn_blocking join error: {e}")))??;

    Ok(Json(assets))
}

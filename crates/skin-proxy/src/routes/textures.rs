//! Texture routes. Every failure here answers 404.

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::Response;
use tracing::debug;

use crate::config::TextureDelivery;
use crate::error::{ApiError, ProxyError};
use crate::state::AppState;
use crate::texture;

/// GET /texture/{hash}
pub async fn texture(
    State(state): State<AppState>,
    Path(hash): Path<String>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let png = texture::png_by_hash(&state.mojang, &hash)
        .await
        .map_err(|e| e.into_not_found().at(uri.path()))?;
    Ok(texture::deliver(png, TextureDelivery::Png))
}

/// GET /of/capes/{username}.png
pub async fn optifine_cape(
    State(state): State<AppState>,
    Path(file): Path<String>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let username = file
        .strip_suffix(".png")
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ProxyError::NotFound("Page Not Found".to_string()).at(uri.path()))?;

    let png = texture::optifine_cape(&state.optifine, username)
        .await
        .map_err(|e| e.into_not_found().at(uri.path()))?;
    debug!(username, "Served OptiFine cape");
    Ok(texture::deliver(png, TextureDelivery::Png))
}

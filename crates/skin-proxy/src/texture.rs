//! Texture proxy: origin bytes in, PNG (or its base64 text) out

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use mojang_api::MojangClient;
use tracing::debug;

use crate::cape;
use crate::config::TextureDelivery;
use crate::error::{ProxyError, Result};
use crate::optifine::OptifineClient;

/// Run an image operation on the blocking pool
pub async fn run_blocking<F, T>(op: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, image::ImageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ProxyError::Transform(e.to_string()))?
        .map_err(ProxyError::from)
}

/// Fetch any texture URL from the textures origin as PNG
pub async fn png_from_url(mojang: &MojangClient, url: &str) -> Result<Vec<u8>> {
    let bytes = mojang
        .texture_by_url(url)
        .await
        .map_err(|e| ProxyError::from(e).into_not_found())?;
    debug!(url, size = bytes.len(), "Fetched texture from origin");
    run_blocking(move || cape::ensure_png(bytes)).await
}

/// Fetch a texture by content hash as PNG
pub async fn png_by_hash(mojang: &MojangClient, hash: &str) -> Result<Vec<u8>> {
    png_from_url(mojang, &mojang.texture_url(hash)).await
}

/// Fetch an OptiFine cape and lay it out on the 64×32 canvas
pub async fn optifine_cape(optifine: &OptifineClient, username: &str) -> Result<Vec<u8>> {
    let bytes = optifine
        .cape(username)
        .await
        .map_err(ProxyError::into_not_found)?;
    run_blocking(move || cape::transcode_cape(&bytes)).await
}

pub fn data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

/// Build the response body for a PNG in the requested delivery format
pub fn deliver(png: Vec<u8>, delivery: TextureDelivery) -> Response {
    match delivery {
        TextureDelivery::Png => (
            [(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))],
            png,
        )
            .into_response(),
        TextureDelivery::Base64 => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )],
            base64::engine::general_purpose::STANDARD.encode(png),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_png, spawn_mock_upstream};
    use image::{GenericImageView, ImageFormat};

    #[tokio::test]
    async fn test_png_passes_through() {
        let upstream = spawn_mock_upstream().await;
        let mojang = upstream.mojang_client();

        let png = png_by_hash(&mojang, "abc123").await.unwrap();
        assert_eq!(png, sample_png(64, 64));
    }

    #[tokio::test]
    async fn test_upstream_url_is_rebased() {
        let upstream = spawn_mock_upstream().await;
        let mojang = upstream.mojang_client();

        let png = png_from_url(&mojang, "http://textures.minecraft.net/texture/cape456")
            .await
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.dimensions(), (64, 32));
    }

    #[tokio::test]
    async fn test_other_formats_become_png() {
        let upstream = spawn_mock_upstream().await;
        let png = png_by_hash(&upstream.mojang_client(), "jpegskin")
            .await
            .unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);
    }

    #[tokio::test]
    async fn test_failures_are_not_found() {
        let upstream = spawn_mock_upstream().await;
        let mojang = upstream.mojang_client();

        let err = png_by_hash(&mojang, "missing").await.unwrap_err();
        assert!(matches!(err, ProxyError::NotFound(_)));

        let err = png_by_hash(&mojang, "garbage").await.unwrap_err();
        assert!(matches!(err, ProxyError::Transform(_)));
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_optifine_capes() {
        let upstream = spawn_mock_upstream().await;
        let optifine = upstream.optifine_client();

        for name in ["legacy", "hd"] {
            let png = optifine_cape(&optifine, name).await.unwrap();
            let decoded = image::load_from_memory(&png).unwrap();
            assert_eq!(decoded.dimensions(), (64, 32));
        }

        let err = optifine_cape(&optifine, "nobody").await.unwrap_err();
        assert!(matches!(err, ProxyError::NotFound(_)));
        assert!(optifine_cape(&optifine, "broken").await.is_err());
    }

    #[tokio::test]
    async fn test_delivery_formats() {
        let png = sample_png(2, 2);

        let response = deliver(png.clone(), TextureDelivery::Png);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let response = deliver(png.clone(), TextureDelivery::Base64);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&body)
            .unwrap();
        assert_eq!(decoded, png);

        assert!(data_url(&png).starts_with("data:image/png;base64,iVBOR"));
    }
}

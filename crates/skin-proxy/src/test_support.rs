//! In-process stand-in for every upstream the proxy talks to

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use geyser_api::GeyserClient;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use mojang_api::{MojangClient, MojangEndpoints};
use serde_json::{json, Value};

use crate::config::{Config, Upstreams};
use crate::fetcher::TextureFetcher;
use crate::optifine::OptifineClient;
use crate::server::create_router;
use crate::state::AppState;

pub const NOTCH: &str = "069a79f444e94726a5befca90e38aaf5";
pub const JEB: &str = "853c80ef3c3749fdaa49938b674adae6";
pub const FAILING: &str = "11111111222233334444555555555555";
pub const UNDECODABLE: &str = "22222222333344445555666666666666";
pub const SLOW: &str = "33333333444455556666777777777777";
/// Answers 200 with a Mojang error document
pub const ERRORING: &str = "44444444555566667777888888888888";

pub struct MockUpstream {
    pub base_url: String,
    pub username_lookups: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub fn mojang_client(&self) -> MojangClient {
        MojangClient::with_endpoints(
            MojangEndpoints {
                session_url: self.base_url.clone(),
                api_url: self.base_url.clone(),
                textures_url: self.base_url.clone(),
            },
            Duration::from_secs(5),
        )
    }

    pub fn geyser_client(&self) -> GeyserClient {
        GeyserClient::with_base_url(&self.base_url, Duration::from_secs(5))
    }

    pub fn optifine_client(&self) -> OptifineClient {
        OptifineClient::new(&self.base_url, Duration::from_secs(5))
    }

    pub fn texture_fetcher(&self) -> TextureFetcher {
        TextureFetcher::new(
            Arc::new(self.mojang_client()),
            Arc::new(self.geyser_client()),
        )
    }

    /// Default config with every upstream pointed at the mock
    pub fn config(&self) -> Config {
        Config {
            upstreams: Upstreams {
                session_url: self.base_url.clone(),
                api_url: self.base_url.clone(),
                textures_url: self.base_url.clone(),
                optifine_url: self.base_url.clone(),
                geyser_url: self.base_url.clone(),
            },
            ..Config::default()
        }
    }

    pub fn router(&self) -> Router {
        self.router_with(self.config())
    }

    pub fn router_with(&self, config: Config) -> Router {
        create_router(AppState::new(config))
    }
}

pub fn get_request(uri: &str) -> axum::extract::Request {
    get_request_with(uri, &[])
}

/// GET with `Host: skins.test` plus extra headers
pub fn get_request_with(uri: &str, headers: &[(&str, &str)]) -> axum::extract::Request {
    let mut builder = axum::extract::Request::builder()
        .uri(uri)
        .header(header::HOST, "skins.test");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(axum::body::Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> axum::body::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([40, 200, 40]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

/// Base64 `textures` property value
pub fn textures_blob(id: &str, name: &str, textures: Value) -> String {
    let document = json!({
        "timestamp": 1_700_000_000_000i64,
        "profileId": id,
        "profileName": name,
        "textures": textures,
    });
    base64::engine::general_purpose::STANDARD.encode(document.to_string())
}

fn session_profile(
    uuid: &str,
    name: &str,
    textures: Value,
    signed: bool,
) -> Value {
    let mut property = json!({
        "name": "textures",
        "value": textures_blob(uuid, name, textures),
    });
    if signed {
        property["signature"] = json!("c2lnbmF0dXJl");
    }
    json!({
        "id": uuid,
        "name": name,
        "properties": [property],
        "profileActions": [],
    })
}

fn png_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

async fn session(
    Path(uuid): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let signed = query.get("unsigned").map(String::as_str) == Some("false");
    match uuid.as_str() {
        NOTCH => Json(session_profile(
            NOTCH,
            "Notch",
            json!({
                "SKIN": {"url": "http://textures.minecraft.net/texture/abc123"},
                "CAPE": {"url": "http://textures.minecraft.net/texture/cape456"},
            }),
            signed,
        ))
        .into_response(),
        JEB => Json(session_profile(
            JEB,
            "jeb_",
            json!({
                "SKIN": {
                    "url": "http://textures.minecraft.net/texture/abc123",
                    "metadata": {"model": "slim"},
                },
            }),
            signed,
        ))
        .into_response(),
        FAILING => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        UNDECODABLE => Json(json!({
            "id": UNDECODABLE,
            "name": "Broken",
            "properties": [{"name": "textures", "value": "!!not base64!!"}],
        }))
        .into_response(),
        ERRORING => Json(json!({
            "error": "BadRequestException",
            "errorMessage": "Not a valid UUID: 44444444555566667777888888888888",
        }))
        .into_response(),
        SLOW => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            StatusCode::NO_CONTENT.into_response()
        }
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn username(
    Path(name): Path<String>,
    lookups: Arc<AtomicUsize>,
) -> Response {
    lookups.fetch_add(1, Ordering::SeqCst);
    match name.as_str() {
        "Notch" => Json(json!({"id": NOTCH, "name": "Notch"})).into_response(),
        "jeb_" => Json(json!({"id": JEB, "name": "jeb_"})).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "path": format!("/users/profiles/minecraft/{}", name),
                "errorMessage": format!("Couldn't find any profile with name {}", name),
            })),
        )
            .into_response(),
    }
}

async fn batch(Json(names): Json<Vec<String>>) -> Json<Value> {
    let found: Vec<Value> = names
        .iter()
        .filter_map(|name| match name.as_str() {
            "Notch" => Some(json!({"id": NOTCH, "name": "Notch"})),
            "jeb_" => Some(json!({"id": JEB, "name": "jeb_"})),
            _ => None,
        })
        .collect();
    Json(Value::Array(found))
}

async fn order_statistics(Json(query): Json<Value>) -> Json<Value> {
    Json(json!({
        "total": 42,
        "last24h": 7,
        "saleVelocityPerSeconds": 0.5,
        "metricKeys": query["metricKeys"],
    }))
}

async fn names(Path(uuid): Path<String>) -> Response {
    if uuid == NOTCH {
        Json(json!([{"name": "Notch"}])).into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn texture(Path(hash): Path<String>) -> Response {
    match hash.as_str() {
        "abc123" => png_response(sample_png(64, 64)),
        "cape456" => png_response(sample_png(64, 32)),
        "jpegskin" => ([(header::CONTENT_TYPE, "image/jpeg")], sample_jpeg(64, 64)).into_response(),
        "garbage" => png_response(b"definitely not an image".to_vec()),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn optifine_cape(Path(file): Path<String>) -> Response {
    match file.as_str() {
        "legacy.png" => png_response(sample_png(46, 22)),
        "hd.png" => png_response(sample_png(92, 44)),
        "broken.png" => png_response(b"not a cape".to_vec()),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn gamertag_xuid(Path(gamertag): Path<String>) -> Json<Value> {
    if gamertag == "Steve Bedrock" {
        Json(json!({"xuid": 2535432196048835u64}))
    } else {
        Json(json!({}))
    }
}

async fn bedrock_skin(Path(xuid): Path<String>) -> Json<Value> {
    match xuid.as_str() {
        "1234567890123456" | "2535432196048835" => Json(json!({
            "hash": "abc123",
            "is_steve": false,
            "last_update": 1_700_000_000_000i64,
            "signature": "c2lnbmF0dXJl",
            "texture_id": "abc123",
            "value": "e30=",
        })),
        _ => Json(json!({})),
    }
}

pub async fn spawn_mock_upstream() -> MockUpstream {
    let username_lookups = Arc::new(AtomicUsize::new(0));
    let lookups = username_lookups.clone();

    let app = Router::new()
        .route("/session/minecraft/profile/{uuid}", get(session))
        .route(
            "/users/profiles/minecraft/{name}",
            get(move |path: Path<String>| username(path, lookups.clone())),
        )
        .route("/profiles/minecraft", post(batch))
        .route("/orders/statistics", post(order_statistics))
        .route("/user/profiles/{uuid}/names", get(names))
        .route("/texture/{hash}", get(texture))
        .route("/capes/{file}", get(optifine_cape))
        .route("/v2/xbox/xuid/{gamertag}", get(gamertag_xuid))
        .route("/v2/skin/{xuid}", get(bedrock_skin));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{}", addr),
        username_lookups,
    }
}

//! Mojang HTTP client

use crate::error::{MojangError, Result};
use crate::types::{NameId, Profile};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Base URLs of the Mojang services
#[derive(Debug, Clone)]
pub struct MojangEndpoints {
    pub session_url: String,
    pub api_url: String,
    pub textures_url: String,
}

impl Default for MojangEndpoints {
    fn default() -> Self {
        Self {
            session_url: MojangClient::SESSION_URL.to_string(),
            api_url: MojangClient::API_URL.to_string(),
            textures_url: MojangClient::TEXTURES_URL.to_string(),
        }
    }
}

/// Client for the Mojang session, account and texture services
pub struct MojangClient {
    http: reqwest::Client,
    endpoints: MojangEndpoints,
}

impl MojangClient {
    pub const SESSION_URL: &'static str = "https://sessionserver.mojang.com";
    pub const API_URL: &'static str = "https://api.mojang.com";
    pub const TEXTURES_URL: &'static str = "http://textures.minecraft.net";

    /// Create a new client against the public Mojang services (30 second timeout)
    pub fn new() -> Self {
        Self::with_endpoints(MojangEndpoints::default(), Duration::from_secs(30))
    }

    /// Create a new client with custom base URLs and timeout
    pub fn with_endpoints(endpoints: MojangEndpoints, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoints: MojangEndpoints {
                session_url: endpoints.session_url.trim_end_matches('/').to_string(),
                api_url: endpoints.api_url.trim_end_matches('/').to_string(),
                textures_url: endpoints.textures_url.trim_end_matches('/').to_string(),
            },
        }
    }

    pub fn endpoints(&self) -> &MojangEndpoints {
        &self.endpoints
    }

    /// Fetch a profile from the session server
    ///
    /// # Arguments
    /// * `uuid` - Profile UUID, with or without hyphens
    /// * `unsigned` - When false, properties carry their Yggdrasil signature
    pub async fn session_profile(&self, uuid: &str, unsigned: bool) -> Result<Profile> {
        let url = format!(
            "{}/session/minecraft/profile/{}?unsigned={}",
            self.endpoints.session_url,
            urlencoding::encode(uuid),
            unsigned
        );
        let value = self.get_json(&url).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Look up the profile currently (or at `at`, epoch seconds) owning a username
    ///
    /// Returns the raw document so callers can relay it untouched.
    pub async fn profile_at(&self, username: &str, at: Option<i64>) -> Result<Value> {
        let mut url = format!(
            "{}/users/profiles/minecraft/{}",
            self.endpoints.api_url,
            urlencoding::encode(username)
        );
        if let Some(at) = at {
            url.push_str(&format!("?at={}", at));
        }

        let value = self.get_json(&url).await?;
        if is_empty_document(&value) {
            return Err(MojangError::NotFound);
        }
        Ok(value)
    }

    /// Resolve a Java username to its profile id
    pub async fn username_to_uuid(&self, username: &str) -> Result<NameId> {
        let value = self.profile_at(username, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Batch username lookup
    pub async fn profiles_by_names(&self, names: &[String]) -> Result<Value> {
        let url = format!("{}/profiles/minecraft", self.endpoints.api_url);
        debug!(url = %url, count = names.len(), "Batch profile lookup");

        let response = self.http.post(&url).json(names).send().await?;
        read_json(response).await
    }

    /// Sales statistics; `body` is passed through as the JSON request body
    pub async fn order_statistics(&self, body: &Value) -> Result<Value> {
        let url = format!("{}/orders/statistics", self.endpoints.api_url);
        debug!(url = %url, "Order statistics lookup");

        let response = self.http.post(&url).json(body).send().await?;
        read_json(response).await
    }

    /// Name history for a profile id
    pub async fn name_history(&self, uuid: &str) -> Result<Value> {
        let url = format!(
            "{}/user/profiles/{}/names",
            self.endpoints.api_url,
            urlencoding::encode(uuid)
        );
        let value = self.get_json(&url).await?;
        if is_empty_document(&value) {
            return Err(MojangError::NotFound);
        }
        Ok(value)
    }

    /// URL of a texture on the configured textures host
    pub fn texture_url(&self, hash: &str) -> String {
        format!(
            "{}/texture/{}",
            self.endpoints.textures_url,
            urlencoding::encode(hash)
        )
    }

    /// Fetch raw texture bytes by content hash
    pub async fn texture(&self, hash: &str) -> Result<Vec<u8>> {
        let url = self.texture_url(hash);
        self.get_bytes(&url).await
    }

    /// Fetch a texture referenced by any URL, rebased onto the configured textures host
    ///
    /// Only the path and query of `url` are kept, so rewritten proxy URLs and
    /// upstream URLs resolve to the same origin request.
    pub async fn texture_by_url(&self, url: &str) -> Result<Vec<u8>> {
        let parsed =
            url::Url::parse(url).map_err(|_| MojangError::InvalidUrl(url.to_string()))?;
        let mut origin_url = format!("{}{}", self.endpoints.textures_url, parsed.path());
        if let Some(query) = parsed.query() {
            origin_url.push('?');
            origin_url.push_str(query);
        }
        self.get_bytes(&origin_url).await
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!(url = %url, "Fetching Mojang document");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url = %url, "Fetching texture");
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), url = %url, "Failed to fetch texture");
            return Err(MojangError::Status(response.status().as_u16()));
        }

        let data = response.bytes().await?.to_vec();
        debug!(size = data.len(), "Fetched texture");
        Ok(data)
    }
}

impl Default for MojangClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a Mojang response into a document or an error
async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Err(MojangError::NotFound);
    }

    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(if status.is_success() {
            MojangError::NotFound
        } else {
            MojangError::Status(status.as_u16())
        });
    }

    match serde_json::from_slice::<Value>(&body) {
        Ok(value) if !status.is_success() || is_error_document(&value) => {
            Err(MojangError::Api {
                status: status.as_u16(),
                body: value,
            })
        }
        Ok(value) => Ok(value),
        Err(e) if status.is_success() => Err(MojangError::Json(e)),
        Err(_) => Err(MojangError::Status(status.as_u16())),
    }
}

fn is_error_document(value: &Value) -> bool {
    value.get("error").is_some() || value.get("errorMessage").is_some()
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route(
                "/session/minecraft/profile/{uuid}",
                get(|axum::extract::Path(uuid): axum::extract::Path<String>| async move {
                    match uuid.as_str() {
                        "069a79f444e94726a5befca90e38aaf5" => Json(json!({
                            "id": "069a79f444e94726a5befca90e38aaf5",
                            "name": "Notch",
                            "properties": [{"name": "textures", "value": "e30="}]
                        }))
                        .into_response(),
                        "broken" => (AxumStatus::INTERNAL_SERVER_ERROR, "boom").into_response(),
                        "erroring" => Json(json!({
                            "error": "BadRequestException",
                            "errorMessage": "Not a valid UUID: erroring"
                        }))
                        .into_response(),
                        _ => AxumStatus::NO_CONTENT.into_response(),
                    }
                }),
            )
            .route(
                "/users/profiles/minecraft/{name}",
                get(|axum::extract::Path(name): axum::extract::Path<String>| async move {
                    if name == "Notch" {
                        Json(json!({"id": "069a79f444e94726a5befca90e38aaf5", "name": "Notch"}))
                            .into_response()
                    } else {
                        (
                            AxumStatus::NOT_FOUND,
                            Json(json!({
                                "path": format!("/users/profiles/minecraft/{}", name),
                                "errorMessage": format!("Couldn't find any profile with name {}", name)
                            })),
                        )
                            .into_response()
                    }
                }),
            )
            .route(
                "/profiles/minecraft",
                post(|Json(names): Json<Vec<String>>| async move {
                    Json(json!([{"id": "069a79f444e94726a5befca90e38aaf5", "name": names[0]}]))
                }),
            )
            .route(
                "/orders/statistics",
                post(|Json(query): Json<Value>| async move {
                    Json(json!({"total": 42, "last24h": 7, "metricKeys": query["metricKeys"]}))
                }),
            )
            .route("/texture/{hash}", get(|| async { vec![1u8, 2, 3] }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base: &str) -> MojangClient {
        MojangClient::with_endpoints(
            MojangEndpoints {
                session_url: base.to_string(),
                api_url: base.to_string(),
                textures_url: base.to_string(),
            },
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_session_profile() {
        let client = client_for(&spawn_upstream().await);
        let profile = client
            .session_profile("069a79f444e94726a5befca90e38aaf5", true)
            .await
            .unwrap();
        assert_eq!(profile.name, "Notch");
        assert_eq!(profile.properties.len(), 1);
    }

    #[tokio::test]
    async fn test_session_profile_error_statuses() {
        let client = client_for(&spawn_upstream().await);

        let err = client.session_profile("unknown", true).await.unwrap_err();
        assert!(matches!(err, MojangError::NotFound));

        let err = client.session_profile("broken", true).await.unwrap_err();
        assert!(matches!(err, MojangError::Status(500)));

        let err = client.session_profile("erroring", true).await.unwrap_err();
        match err {
            MojangError::Api { status, body } => {
                assert_eq!(status, 200);
                assert_eq!(body["error"], "BadRequestException");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_username_lookup() {
        let client = client_for(&spawn_upstream().await);

        let found = client.username_to_uuid("Notch").await.unwrap();
        assert_eq!(found.id, "069a79f444e94726a5befca90e38aaf5");

        let err = client.username_to_uuid("nobody").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_batch_lookup() {
        let client = client_for(&spawn_upstream().await);
        let value = client
            .profiles_by_names(&["Notch".to_string()])
            .await
            .unwrap();
        assert_eq!(value[0]["name"], "Notch");
    }

    #[tokio::test]
    async fn test_order_statistics_forwards_body() {
        let client = client_for(&spawn_upstream().await);
        let value = client
            .order_statistics(&json!({"metricKeys": ["item_sold_minecraft"]}))
            .await
            .unwrap();
        assert_eq!(value["total"], 42);
        assert_eq!(value["metricKeys"][0], "item_sold_minecraft");
    }

    #[tokio::test]
    async fn test_texture_by_url_rebases_onto_textures_host() {
        let client = client_for(&spawn_upstream().await);
        let bytes = client
            .texture_by_url("http://textures.minecraft.net/texture/abc123")
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);

        let err = client.texture_by_url("not a url").await.unwrap_err();
        assert!(matches!(err, MojangError::InvalidUrl(_)));
    }

    #[test]
    fn test_empty_document_detection() {
        assert!(is_empty_document(&json!({})));
        assert!(is_empty_document(&Value::Null));
        assert!(!is_empty_document(&json!([])));
        assert!(is_error_document(&json!({"error": "x"})));
        assert!(!is_error_document(&json!({"id": "x"})));
    }
}

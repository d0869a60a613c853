use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::GeyserError;
use crate::types::{BedrockSkin, XuidResponse};

const DEFAULT_BASE_URL: &str = "https://api.geysermc.org";

/// GeyserMC global API client
pub struct GeyserClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeyserClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    /// Create a client against a custom API host
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve an Xbox gamertag to its XUID
    pub async fn xuid_for_gamertag(&self, gamertag: &str) -> crate::Result<String> {
        let url = format!(
            "{}/v2/xbox/xuid/{}",
            self.base_url,
            urlencoding::encode(gamertag)
        );
        let value = self.get_json(&url, gamertag).await?;

        if value.get("xuid").map_or(true, Value::is_null) {
            return Err(GeyserError::NotFound(format!("gamertag {gamertag}")));
        }
        let response: XuidResponse = serde_json::from_value(value)?;

        debug!(gamertag, xuid = %response.xuid, "Resolved gamertag");
        Ok(response.xuid)
    }

    /// Fetch the converted skin Geyser holds for an XUID
    pub async fn skin(&self, xuid: &str) -> crate::Result<BedrockSkin> {
        let url = format!("{}/v2/skin/{}", self.base_url, urlencoding::encode(xuid));
        let value = self.get_json(&url, xuid).await?;
        let skin: BedrockSkin = serde_json::from_value(value)?;

        if skin.texture_id.is_none() {
            return Err(GeyserError::NotFound(format!("a skin for {xuid}")));
        }
        Ok(skin)
    }

    async fn get_json(&self, url: &str, subject: &str) -> crate::Result<Value> {
        debug!(url = %url, "Fetching Geyser document");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Err(GeyserError::NotFound(subject.to_string()));
        }
        if !status.is_success() {
            warn!(status = %status, url = %url, "Geyser request failed");
            return Err(GeyserError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

impl Default for GeyserClient {
    fn default() -> Self {
        Self::new()
    }
}

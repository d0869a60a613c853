//! OptiFine cape server client

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{ProxyError, Result};

pub struct OptifineClient {
    http: reqwest::Client,
    base_url: String,
}

impl OptifineClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the raw cape image of a player
    pub async fn cape(&self, username: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/capes/{}.png",
            self.base_url,
            urlencoding::encode(username)
        );
        debug!(url = %url, "Fetching OptiFine cape");

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "OptiFine unreachable");
            ProxyError::Upstream {
                status: None,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = %status, username, "No OptiFine cape");
            return Err(ProxyError::Upstream {
                status: Some(status.as_u16()),
                message: format!("OptiFine returned status {}", status),
            });
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Upstream {
                status: None,
                message: e.to_string(),
            })?
            .to_vec();
        Ok(data)
    }
}

//! Profile rewriting
//!
//! Texture URLs inside a relayed session profile are redirected to this
//! service (or inlined), so clients never talk to the textures host.

use std::sync::Arc;

use mojang_api::{textures, MojangClient, Profile};
use tracing::debug;
use url::Url;

use crate::config::RewriteMode;
use crate::error::{ProxyError, Result};
use crate::texture;

/// Re-point `upstream` at `origin`, keeping its path and query
pub fn proxied_url(upstream: &str, origin: &str, prefix: &str) -> Result<String> {
    let parsed = Url::parse(upstream)
        .map_err(|e| ProxyError::Decode(format!("invalid texture URL {}: {}", upstream, e)))?;

    let mut rewritten = format!(
        "{}{}{}",
        origin.trim_end_matches('/'),
        prefix,
        parsed.path()
    );
    if let Some(query) = parsed.query() {
        rewritten.push('?');
        rewritten.push_str(query);
    }
    Ok(rewritten)
}

pub struct ProfileRewriter {
    mode: RewriteMode,
    prefix: String,
    mojang: Arc<MojangClient>,
}

impl ProfileRewriter {
    pub fn new(mode: RewriteMode, prefix: impl Into<String>, mojang: Arc<MojangClient>) -> Self {
        Self {
            mode,
            prefix: prefix.into(),
            mojang,
        }
    }

    /// Rewrite every texture URL of the primary property
    ///
    /// A profile without properties is returned as is. Only the property
    /// value changes; its signature is kept as upstream sent it.
    pub async fn rewrite(&self, mut profile: Profile, origin: &str) -> Result<Profile> {
        let Some(index) = profile.textures_index() else {
            return Ok(profile);
        };
        let property = &mut profile.properties[index];
        let mut decoded = textures::decode(&property.value)?;

        for slot in decoded.textures.slots() {
            let Some(entry) = decoded.textures.get_mut(slot) else {
                continue;
            };
            let rewritten = match self.mode {
                RewriteMode::ProxyPath => proxied_url(&entry.url, origin, &self.prefix)?,
                RewriteMode::DataUrl => {
                    let png = texture::png_from_url(&self.mojang, &entry.url).await?;
                    texture::data_url(&png)
                }
            };
            debug!(slot = %slot, from = %entry.url, mode = ?self.mode, "Rewrote texture URL");
            entry.url = rewritten;
        }

        property.value =
            textures::encode(&decoded).map_err(|e| ProxyError::Decode(e.to_string()))?;
        Ok(profile)
    }
}

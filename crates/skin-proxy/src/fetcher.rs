//! Resolved identity → texture URL
//!
//! Java players are looked up on the session server and their `textures`
//! property decoded; Bedrock players go through the Geyser skin lookup that
//! matches their identifier kind.

use std::sync::Arc;

use geyser_api::GeyserClient;
use mojang_api::{textures, MojangClient, Profile, TextureSlot};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ProxyError, Result};
use crate::identity::ResolvedIdentity;

pub struct TextureFetcher {
    mojang: Arc<MojangClient>,
    geyser: Arc<GeyserClient>,
}

impl TextureFetcher {
    pub fn new(mojang: Arc<MojangClient>, geyser: Arc<GeyserClient>) -> Self {
        Self { mojang, geyser }
    }

    /// Session profile of a Java player
    pub async fn java_profile(&self, uuid: &Uuid, unsigned: bool) -> Result<Profile> {
        let profile = self
            .mojang
            .session_profile(&uuid.simple().to_string(), unsigned)
            .await?;
        Ok(profile)
    }

    /// Origin URL of the requested texture slot
    pub async fn texture_url(
        &self,
        identity: &ResolvedIdentity,
        slot: TextureSlot,
    ) -> Result<String> {
        let url = match identity {
            ResolvedIdentity::Java(uuid) => self.java_texture_url(uuid, slot).await?,
            ResolvedIdentity::BedrockXuid(xuid) | ResolvedIdentity::BedrockFuid(xuid) => {
                self.bedrock_texture_url(xuid, slot).await?
            }
            ResolvedIdentity::BedrockGamertag(gamertag) => {
                let xuid = self.geyser.xuid_for_gamertag(gamertag).await?;
                self.bedrock_texture_url(&xuid, slot).await?
            }
        };

        debug!(identity = ?identity, slot = %slot, url = %url, "Texture URL known");
        Ok(url)
    }

    async fn java_texture_url(&self, uuid: &Uuid, slot: TextureSlot) -> Result<String> {
        let profile = self.java_profile(uuid, true).await?;
        let property = profile
            .textures_property()
            .ok_or_else(|| ProxyError::NotFound(format!("{} has no textures", profile.name)))?;
        let decoded = textures::decode(&property.value)?;

        decoded
            .textures
            .get(slot)
            .map(|entry| entry.url.clone())
            .ok_or_else(|| ProxyError::NotFound(format!("{} has no {}", profile.name, slot)))
    }

    /// Geyser only holds skins
    async fn bedrock_texture_url(&self, xuid: &str, slot: TextureSlot) -> Result<String> {
        if slot == TextureSlot::Cape {
            return Err(ProxyError::NotFound(
                "Bedrock players have no cape".to_string(),
            ));
        }

        let skin = self.geyser.skin(xuid).await?;
        let texture_id = skin
            .texture_id
            .ok_or_else(|| ProxyError::NotFound(format!("No Bedrock skin for {}", xuid)))?;
        Ok(self.mojang.texture_url(&texture_id))
    }
}

//! Player identifier classification and resolution
//!
//! A token can name a Java profile (UUID or username) or a Bedrock player
//! (XUID, Floodgate id, gamertag, or a Geyser-prefixed name). Classification
//! is purely syntactic; only bare usernames need an upstream lookup, and a
//! failed lookup is taken to mean the name belongs to a Bedrock player.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use mojang_api::MojangClient;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ProxyError, Result};

/// Prefixes Geyser puts in front of Bedrock usernames by default
const GEYSER_MARKERS: [char; 2] = ['.', '*'];
const XUID_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BedrockId {
    Xuid(String),
    Fuid(String),
    Gamertag(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    JavaUuid(Uuid),
    JavaUsername(String),
    Bedrock(BedrockId),
}

/// A user-supplied token after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentifier {
    pub raw: String,
    /// A Geyser prefix or marker was stripped from the token
    pub prefixed: bool,
    pub classification: Classification,
}

impl UserIdentifier {
    pub fn normalized(&self) -> String {
        match &self.classification {
            Classification::JavaUuid(uuid) => uuid.simple().to_string(),
            Classification::JavaUsername(name) => name.clone(),
            Classification::Bedrock(BedrockId::Xuid(id))
            | Classification::Bedrock(BedrockId::Fuid(id))
            | Classification::Bedrock(BedrockId::Gamertag(id)) => id.clone(),
        }
    }
}

/// Final answer of the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIdentity {
    Java(Uuid),
    BedrockXuid(String),
    BedrockFuid(String),
    BedrockGamertag(String),
}

impl From<BedrockId> for ResolvedIdentity {
    fn from(id: BedrockId) -> Self {
        match id {
            BedrockId::Xuid(xuid) => Self::BedrockXuid(xuid),
            BedrockId::Fuid(fuid) => Self::BedrockFuid(fuid),
            BedrockId::Gamertag(gamertag) => Self::BedrockGamertag(gamertag),
        }
    }
}

/// Classify a raw token. First matching rule wins.
pub fn classify(raw: &str, prefix: Option<&str>) -> Result<UserIdentifier> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ProxyError::Classification("empty identifier".to_string()));
    }

    let identifier = |prefixed, classification| UserIdentifier {
        raw: raw.to_string(),
        prefixed,
        classification,
    };

    if is_xuid(token) {
        return Ok(identifier(
            false,
            Classification::Bedrock(BedrockId::Xuid(token.to_string())),
        ));
    }

    if let Some(rest) = prefix
        .filter(|p| !p.is_empty())
        .and_then(|p| token.strip_prefix(p))
    {
        return Ok(identifier(true, Classification::Bedrock(bedrock_id(rest)?)));
    }

    if let Some(rest) = token.strip_prefix(&GEYSER_MARKERS[..]) {
        return Ok(identifier(true, Classification::Bedrock(bedrock_id(rest)?)));
    }

    if let Some(uuid) = parse_loose_uuid(token) {
        let classification = match floodgate_xuid(&uuid) {
            Some(xuid) => Classification::Bedrock(bedrock_id(&xuid.to_string())?),
            None => Classification::JavaUuid(uuid),
        };
        return Ok(identifier(false, classification));
    }

    if is_java_username(token) {
        return Ok(identifier(
            false,
            Classification::JavaUsername(token.to_string()),
        ));
    }

    // No Java account can carry this name
    Ok(identifier(false, Classification::Bedrock(bedrock_id(token)?)))
}

/// Type a Bedrock-origin token
fn bedrock_id(token: &str) -> Result<BedrockId> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ProxyError::Classification(
            "nothing left after stripping prefix".to_string(),
        ));
    }

    Ok(if is_xuid(token) {
        BedrockId::Xuid(token.to_string())
    } else if is_numeric(token) {
        BedrockId::Fuid(token.to_string())
    } else {
        BedrockId::Gamertag(token.to_string())
    })
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn is_xuid(token: &str) -> bool {
    token.len() == XUID_LEN && is_numeric(token)
}

fn is_java_username(token: &str) -> bool {
    (1..=16).contains(&token.len())
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// 32 hex digits, hyphens anywhere
fn parse_loose_uuid(token: &str) -> Option<Uuid> {
    let hex: String = token.chars().filter(|c| *c != '-').collect();
    if hex.len() != 32 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Uuid::try_parse(&hex).ok()
}

/// Floodgate maps a Bedrock player to `00000000-0000-0000-<xuid in hex>`
fn floodgate_xuid(uuid: &Uuid) -> Option<u64> {
    let (high, low) = uuid.as_u64_pair();
    (high == 0).then_some(low)
}

/// Resolves identifiers to a canonical texture source, memoizing results
pub struct IdentityResolver {
    mojang: Arc<MojangClient>,
    memo: Cache<String, ResolvedIdentity>,
}

impl IdentityResolver {
    pub fn new(mojang: Arc<MojangClient>, ttl_secs: u64) -> Self {
        let memo = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { mojang, memo }
    }

    pub async fn resolve(&self, raw: &str, prefix: Option<&str>) -> Result<ResolvedIdentity> {
        let identifier = classify(raw, prefix)?;
        debug!(
            raw = %identifier.raw,
            normalized = %identifier.normalized(),
            prefixed = identifier.prefixed,
            classification = ?identifier.classification,
            "Classified identifier"
        );

        let key = format!("{}|{}", prefix.unwrap_or_default(), raw.trim());
        if let Some(cached) = self.memo.get(&key).await {
            return Ok(cached);
        }

        let resolved = match identifier.classification {
            Classification::JavaUuid(uuid) => ResolvedIdentity::Java(uuid),
            Classification::Bedrock(id) => id.into(),
            Classification::JavaUsername(name) => self.lookup_username(&name).await?,
        };

        self.memo.insert(key, resolved.clone()).await;
        Ok(resolved)
    }

    /// Username → UUID; any failure falls through to a Bedrock identity
    async fn lookup_username(&self, name: &str) -> Result<ResolvedIdentity> {
        match self.mojang.username_to_uuid(name).await {
            Ok(found) => match parse_loose_uuid(&found.id) {
                Some(uuid) => {
                    debug!(name, uuid = %uuid, "Resolved Java username");
                    return Ok(ResolvedIdentity::Java(uuid));
                }
                None => debug!(name, id = %found.id, "Username lookup returned a malformed id"),
            },
            Err(e) => debug!(name, error = %e, "Username lookup failed, assuming Bedrock"),
        }

        Ok(bedrock_id(name)?.into())
    }
}

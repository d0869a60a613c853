//! Service configuration read from the environment

use std::env;
use std::str::FromStr;

use mojang_api::MojangClient;

/// How texture URLs inside a relayed profile are rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
    /// Point at this service's texture route
    ProxyPath,
    /// Inline the texture as a `data:image/png;base64,` URL
    DataUrl,
}

impl FromStr for RewriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proxy-path" | "path" => Ok(Self::ProxyPath),
            "data-url" | "inline" => Ok(Self::DataUrl),
            other => Err(format!("unknown rewrite mode: {}", other)),
        }
    }
}

/// Body format of a resolved texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureDelivery {
    Png,
    Base64,
}

impl FromStr for TextureDelivery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "base64" => Ok(Self::Base64),
            other => Err(format!("unknown texture delivery: {}", other)),
        }
    }
}

/// Base URLs of every upstream service
#[derive(Debug, Clone)]
pub struct Upstreams {
    pub session_url: String,
    pub api_url: String,
    pub textures_url: String,
    pub optifine_url: String,
    pub geyser_url: String,
}

impl Default for Upstreams {
    fn default() -> Self {
        Self {
            session_url: MojangClient::SESSION_URL.to_string(),
            api_url: MojangClient::API_URL.to_string(),
            textures_url: MojangClient::TEXTURES_URL.to_string(),
            optifine_url: "http://s.optifine.net".to_string(),
            geyser_url: "https://api.geysermc.org".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeepAlive {
    pub url: String,
    pub interval_secs: u64,
}

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Origin used in rewritten URLs; derived from request headers when unset
    pub public_url: Option<String>,
    /// Honor `X-Forwarded-Host`/`X-Forwarded-Proto` when deriving the origin
    pub trust_forwarded_headers: bool,
    pub request_timeout_secs: u64,
    pub response_cache_ttl_secs: u64,
    pub response_cache_capacity: u64,
    pub identity_cache_ttl_secs: u64,
    pub cache_max_age_secs: u64,
    pub rewrite_mode: RewriteMode,
    /// Path inserted between the origin and the upstream texture path
    pub texture_path_prefix: String,
    pub texture_delivery: TextureDelivery,
    pub upstreams: Upstreams,
    pub keep_alive: Option<KeepAlive>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            public_url: None,
            trust_forwarded_headers: false,
            request_timeout_secs: 5,
            response_cache_ttl_secs: 15 * 60,
            response_cache_capacity: 10_000,
            identity_cache_ttl_secs: 60,
            cache_max_age_secs: 300,
            rewrite_mode: RewriteMode::ProxyPath,
            texture_path_prefix: String::new(),
            texture_delivery: TextureDelivery::Png,
            upstreams: Upstreams::default(),
            keep_alive: None,
        }
    }
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let rewrite_mode = match env::var("REWRITE_MODE") {
            Ok(mode) => mode.parse()?,
            Err(_) => defaults.rewrite_mode,
        };

        let texture_delivery = match env::var("TEXTURE_DELIVERY") {
            Ok(delivery) => delivery.parse()?,
            Err(_) => defaults.texture_delivery,
        };

        let texture_path_prefix = match env::var("TEXTURE_PATH_PREFIX") {
            Ok(prefix) => normalize_prefix(&prefix)?,
            Err(_) => defaults.texture_path_prefix,
        };

        let upstreams = Upstreams {
            session_url: env::var("MOJANG_SESSION_URL").unwrap_or(defaults.upstreams.session_url),
            api_url: env::var("MOJANG_API_URL").unwrap_or(defaults.upstreams.api_url),
            textures_url: env::var("MOJANG_TEXTURES_URL")
                .unwrap_or(defaults.upstreams.textures_url),
            optifine_url: env::var("OPTIFINE_URL").unwrap_or(defaults.upstreams.optifine_url),
            geyser_url: env::var("GEYSER_API_URL").unwrap_or(defaults.upstreams.geyser_url),
        };

        let keep_alive_enabled = env_bool("KEEP_ALIVE_ENABLED");
        let keep_alive = match env::var("KEEP_ALIVE_URL") {
            Ok(url) if keep_alive_enabled && !url.trim().is_empty() => Some(KeepAlive {
                url,
                interval_secs: env_u64("KEEP_ALIVE_INTERVAL_SECS").unwrap_or(240),
            }),
            _ => None,
        };

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            public_url: env::var("PUBLIC_URL")
                .ok()
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            trust_forwarded_headers: env_bool("TRUST_FORWARDED_HEADERS"),
            request_timeout_secs: env_u64("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            response_cache_ttl_secs: env_u64("RESPONSE_CACHE_TTL_SECS")
                .unwrap_or(defaults.response_cache_ttl_secs),
            response_cache_capacity: env_u64("RESPONSE_CACHE_CAPACITY")
                .unwrap_or(defaults.response_cache_capacity),
            identity_cache_ttl_secs: env_u64("IDENTITY_CACHE_TTL_SECS")
                .unwrap_or(defaults.identity_cache_ttl_secs),
            cache_max_age_secs: env_u64("CACHE_MAX_AGE_SECS")
                .unwrap_or(defaults.cache_max_age_secs),
            rewrite_mode,
            texture_path_prefix,
            texture_delivery,
            upstreams,
            keep_alive,
        })
    }
}

fn env_bool(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn env_u64(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// `textures/` → `/textures`, empty stays empty
///
/// The prefix is mounted as a route, so only plain path characters are allowed.
fn normalize_prefix(prefix: &str) -> Result<String, String> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    let valid = trimmed
        .split('/')
        .all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
        });
    if !valid {
        return Err(format!("invalid texture path prefix: {}", prefix));
    }
    Ok(format!("/{}", trimmed))
}

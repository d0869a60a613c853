//! Shared state handed to every route handler

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geyser_api::GeyserClient;
use mojang_api::{MojangClient, MojangEndpoints};

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::fetcher::TextureFetcher;
use crate::identity::IdentityResolver;
use crate::optifine::OptifineClient;
use crate::rewrite::ProfileRewriter;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mojang: Arc<MojangClient>,
    pub optifine: Arc<OptifineClient>,
    pub identity: Arc<IdentityResolver>,
    pub fetcher: Arc<TextureFetcher>,
    pub rewriter: Arc<ProfileRewriter>,
    pub response_cache: Arc<ResponseCache>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire up every client and cache from the configuration
    pub fn new(config: Config) -> Self {
        // Outlives the request deadline, which answers 504 first
        let timeout = Duration::from_secs(config.request_timeout_secs + 1);

        let mojang = Arc::new(MojangClient::with_endpoints(
            MojangEndpoints {
                session_url: config.upstreams.session_url.clone(),
                api_url: config.upstreams.api_url.clone(),
                textures_url: config.upstreams.textures_url.clone(),
            },
            timeout,
        ));
        let geyser = Arc::new(GeyserClient::with_base_url(
            &config.upstreams.geyser_url,
            timeout,
        ));
        let optifine = Arc::new(OptifineClient::new(&config.upstreams.optifine_url, timeout));

        Self {
            identity: Arc::new(IdentityResolver::new(
                mojang.clone(),
                config.identity_cache_ttl_secs,
            )),
            fetcher: Arc::new(TextureFetcher::new(mojang.clone(), geyser)),
            rewriter: Arc::new(ProfileRewriter::new(
                config.rewrite_mode,
                config.texture_path_prefix.clone(),
                mojang.clone(),
            )),
            response_cache: Arc::new(ResponseCache::new(
                config.response_cache_ttl_secs,
                config.response_cache_capacity,
            )),
            mojang,
            optifine,
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }
}

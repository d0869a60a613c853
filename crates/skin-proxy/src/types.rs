//! Core types for the skin proxy

use serde::{Deserialize, Serialize};

/// Statistics about the response cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}

/// `?unsigned=` on the profile route; anything but `false` means unsigned
#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub unsigned: Option<String>,
}

impl SessionQuery {
    pub fn unsigned(&self) -> bool {
        self.unsigned.as_deref() != Some("false")
    }
}

/// `?at=` on the username route; non-integers are ignored
#[derive(Debug, Default, Deserialize)]
pub struct AtQuery {
    pub at: Option<String>,
}

impl AtQuery {
    pub fn at(&self) -> Option<i64> {
        self.at.as_deref().and_then(|at| at.trim().parse().ok())
    }
}

/// Query of the unified texture route
#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub prefix: Option<String>,
    pub format: Option<String>,
}

//! Error types for the Mojang API client

use crate::textures::TextureDecodeError;
use std::fmt;

/// Errors that can occur when talking to the Mojang services
#[derive(Debug)]
pub enum MojangError {
    /// HTTP request failed before a response arrived
    Http(reqwest::Error),
    /// Upstream answered with no content or an empty document
    NotFound,
    /// Upstream answered with a structured error document
    Api {
        status: u16,
        body: serde_json::Value,
    },
    /// Upstream answered with a non-success status and no usable body
    Status(u16),
    /// Failed to parse JSON response
    Json(serde_json::Error),
    /// The texture property could not be decoded
    Texture(TextureDecodeError),
    /// A texture URL could not be parsed
    InvalidUrl(String),
}

impl MojangError {
    /// HTTP status reported by upstream, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Status(status) => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl fmt::Display for MojangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Mojang HTTP error: {}", e),
            Self::NotFound => write!(f, "Mojang returned no profile"),
            Self::Api { status, body } => {
                let message = body
                    .get("errorMessage")
                    .or_else(|| body.get("error"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown error");
                write!(f, "Mojang API error ({}): {}", status, message)
            }
            Self::Status(status) => write!(f, "Mojang returned status {}", status),
            Self::Json(e) => write!(f, "Mojang JSON parse error: {}", e),
            Self::Texture(e) => write!(f, "{}", e),
            Self::InvalidUrl(url) => write!(f, "Invalid texture URL: {}", url),
        }
    }
}

impl std::error::Error for MojangError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Texture(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MojangError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for MojangError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<TextureDecodeError> for MojangError {
    fn from(e: TextureDecodeError) -> Self {
        Self::Texture(e)
    }
}

/// Result type for Mojang API operations
pub type Result<T> = std::result::Result<T, MojangError>;

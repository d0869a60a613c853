//! Error types for the skin proxy

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use geyser_api::GeyserError;
use mojang_api::{MojangError, TextureDecodeError};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum ProxyError {
    /// The identifier matched no resolution rule
    Classification(String),
    NotFound(String),
    /// Profile endpoint called with something that is not a UUID
    InvalidUuid(String),
    MethodNotAllowed,
    /// A dependency failed; `status` is absent for transport errors
    Upstream {
        status: Option<u16>,
        message: String,
    },
    /// A structured upstream error document, relayed verbatim
    UpstreamBody(serde_json::Value),
    Decode(String),
    Transform(String),
    Timeout,
    Config(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Classification(_)
            | Self::NotFound(_)
            | Self::InvalidUuid(_)
            | Self::UpstreamBody(_)
            | Self::Transform(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Upstream {
                status: Some(status),
                ..
            } if *status < 500 => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Collapse any failure into NotFound, for routes that only ever answer 200 or 404
    pub fn into_not_found(self) -> Self {
        match self {
            Self::NotFound(_) | Self::UpstreamBody(_) | Self::Timeout => self,
            other => Self::NotFound(other.to_string()),
        }
    }

    /// Attach the request path for the response body
    pub fn at(self, path: impl Into<String>) -> ApiError {
        ApiError {
            path: path.into(),
            error: self,
        }
    }
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classification(msg) => write!(f, "Unrecognized identifier: {}", msg),
            Self::NotFound(msg) => write!(f, "{}", msg),
            Self::InvalidUuid(token) => write!(f, "Not a valid UUID: {}", token),
            Self::MethodNotAllowed => write!(
                f,
                "The method specified in the request is not allowed for the resource identified by the request URI"
            ),
            Self::Upstream {
                status: Some(status),
                message,
            } => write!(f, "Upstream error ({}): {}", status, message),
            Self::Upstream {
                status: None,
                message,
            } => write!(f, "Upstream unreachable: {}", message),
            Self::UpstreamBody(body) => write!(f, "Upstream error: {}", body),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
            Self::Transform(msg) => write!(f, "Image transform error: {}", msg),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ProxyError {}

impl From<MojangError> for ProxyError {
    fn from(err: MojangError) -> Self {
        match err {
            MojangError::NotFound => Self::NotFound("Profile not found".to_string()),
            MojangError::Api { status, body } if status < 500 => Self::UpstreamBody(body),
            MojangError::Json(e) => Self::Decode(e.to_string()),
            MojangError::Texture(e) => Self::Decode(e.to_string()),
            MojangError::InvalidUrl(url) => Self::Decode(format!("invalid texture URL {}", url)),
            other => Self::Upstream {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

impl From<GeyserError> for ProxyError {
    fn from(err: GeyserError) -> Self {
        match err {
            GeyserError::NotFound(what) => Self::NotFound(format!("No Bedrock record of {}", what)),
            GeyserError::Json(e) => Self::Decode(e.to_string()),
            GeyserError::Status(status) => Self::Upstream {
                status: Some(status),
                message: err.to_string(),
            },
            GeyserError::Http(e) => Self::Upstream {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
        }
    }
}

impl From<TextureDecodeError> for ProxyError {
    fn from(err: TextureDecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<image::ImageError> for ProxyError {
    fn from(err: image::ImageError) -> Self {
        Self::Transform(err.to_string())
    }
}

impl From<tracing_subscriber::filter::ParseError> for ProxyError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for ProxyError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

/// A `ProxyError` bound to the request path it terminated
#[derive(Debug)]
pub struct ApiError {
    pub path: String,
    pub error: ProxyError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status();

        if status.is_server_error() {
            tracing::warn!(path = %self.path, error = %self.error, "Request failed");
        } else {
            tracing::debug!(path = %self.path, error = %self.error, "Request rejected");
        }

        let body = match self.error {
            ProxyError::UpstreamBody(body) => body,
            ProxyError::InvalidUuid(ref token) => json!({
                "path": self.path,
                "errorMessage": format!("Not a valid UUID: {}", token),
                "developerMessage": format!("Not a valid UUID: {}", token),
            }),
            ProxyError::MethodNotAllowed => json!({
                "error": "Method Not Allowed",
                "errorMessage": self.error.to_string(),
                "path": self.path,
            }),
            ref other => json!({
                "message": other.to_string(),
                "path": self.path,
            }),
        };

        (status, Json(body)).into_response()
    }
}

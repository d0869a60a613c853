use std::fmt;

/// Errors from the GeyserMC API client
#[derive(Debug)]
pub enum GeyserError {
    Http(reqwest::Error),
    /// The player is unknown to Geyser or has no skin on record
    NotFound(String),
    Status(u16),
    Json(serde_json::Error),
}

impl fmt::Display for GeyserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Geyser HTTP error: {e}"),
            Self::NotFound(what) => write!(f, "Geyser has no record of {what}"),
            Self::Status(status) => write!(f, "Geyser returned status {status}"),
            Self::Json(e) => write!(f, "Geyser JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for GeyserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeyserError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<serde_json::Error> for GeyserError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, GeyserError>;

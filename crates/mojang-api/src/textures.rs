//! Codec for the `textures` profile property
//!
//! The session server embeds skin and cape locations as a base64 string of a
//! JSON document. The document is an unversioned third-party format, so
//! unknown keys are kept verbatim and only the keys every profile carries are
//! required.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Standard alphabet, padded on encode, padding optional on decode
const BLOB_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Texture slots a profile can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureSlot {
    #[serde(rename = "SKIN")]
    Skin,
    #[serde(rename = "CAPE")]
    Cape,
}

impl TextureSlot {
    /// Presentation order inside an encoded property
    pub const ALL: [TextureSlot; 2] = [TextureSlot::Skin, TextureSlot::Cape];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skin => "SKIN",
            Self::Cape => "CAPE",
        }
    }
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextureSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SKIN" => Ok(Self::Skin),
            "CAPE" => Ok(Self::Cape),
            _ => Err(format!("Unknown texture type: {}", s)),
        }
    }
}

/// Decoded `textures` property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureProperty {
    pub timestamp: i64,
    #[serde(rename = "profileId")]
    pub profile_id: String,
    #[serde(rename = "profileName")]
    pub profile_name: String,
    #[serde(
        rename = "signatureRequired",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub signature_required: Option<bool>,
    pub textures: Textures,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Slot → texture mapping. SKIN serializes before CAPE.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Textures {
    #[serde(rename = "SKIN", default, skip_serializing_if = "Option::is_none")]
    pub skin: Option<TextureEntry>,
    #[serde(rename = "CAPE", default, skip_serializing_if = "Option::is_none")]
    pub cape: Option<TextureEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Textures {
    pub fn get(&self, slot: TextureSlot) -> Option<&TextureEntry> {
        match slot {
            TextureSlot::Skin => self.skin.as_ref(),
            TextureSlot::Cape => self.cape.as_ref(),
        }
    }

    pub fn get_mut(&mut self, slot: TextureSlot) -> Option<&mut TextureEntry> {
        match slot {
            TextureSlot::Skin => self.skin.as_mut(),
            TextureSlot::Cape => self.cape.as_mut(),
        }
    }

    /// Slots present in this mapping, SKIN first
    pub fn slots(&self) -> Vec<TextureSlot> {
        TextureSlot::ALL
            .into_iter()
            .filter(|slot| self.get(*slot).is_some())
            .collect()
    }
}

impl TextureEntry {
    /// Skin model from the metadata (`slim` for Alex-style arms)
    pub fn model(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("model")?.as_str()
    }
}

/// Failure at one stage of decoding a property blob
#[derive(Debug)]
pub enum TextureDecodeError {
    Base64(base64::DecodeError),
    Utf8(std::string::FromUtf8Error),
    /// Not a JSON document
    Json(serde_json::Error),
    /// Valid JSON, but a required key is missing or mistyped
    Schema(serde_json::Error),
}

impl fmt::Display for TextureDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(e) => write!(f, "Texture property is not valid base64: {}", e),
            Self::Utf8(e) => write!(f, "Texture property is not valid UTF-8: {}", e),
            Self::Json(e) => write!(f, "Texture property is not valid JSON: {}", e),
            Self::Schema(e) => write!(f, "Texture property is malformed: {}", e),
        }
    }
}

impl std::error::Error for TextureDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Base64(e) => Some(e),
            Self::Utf8(e) => Some(e),
            Self::Json(e) | Self::Schema(e) => Some(e),
        }
    }
}

/// Decode a base64 property value into its texture document
pub fn decode(blob: &str) -> Result<TextureProperty, TextureDecodeError> {
    let bytes = BLOB_ENGINE
        .decode(blob.trim())
        .map_err(TextureDecodeError::Base64)?;
    let text = String::from_utf8(bytes).map_err(TextureDecodeError::Utf8)?;
    let value: Value = serde_json::from_str(&text).map_err(TextureDecodeError::Json)?;
    serde_json::from_value(value).map_err(TextureDecodeError::Schema)
}

/// Encode a texture document back into a base64 property value
pub fn encode(property: &TextureProperty) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(property)?;
    Ok(BLOB_ENGINE.encode(json.as_bytes()))
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Response of `/v2/xbox/xuid/{gamertag}`
///
/// Geyser serves the XUID as a JSON number; it is kept as its decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct XuidResponse {
    #[serde(deserialize_with = "number_or_string")]
    pub xuid: String,
}

/// Response of `/v2/skin/{xuid}`
///
/// Unknown players yield an empty object, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedrockSkin {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub is_steve: bool,
    #[serde(default)]
    pub last_update: Option<i64>,
    #[serde(default)]
    pub signature: Option<String>,
    /// Hash of the converted skin on textures.minecraft.net
    #[serde(default)]
    pub texture_id: Option<String>,
    /// Java-format `textures` property value
    #[serde(default)]
    pub value: Option<String>,
}

fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        other => Err(serde::de::Error::custom(format!(
            "expected xuid number, got {other}"
        ))),
    }
}

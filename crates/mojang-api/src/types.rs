//! Mojang API response types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the profile property that carries encoded textures
pub const TEXTURES_PROPERTY: &str = "textures";

/// Session server profile
///
/// Keys this crate does not model (such as `profileActions`) are kept in
/// `extra` so a profile can be re-served without losing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<ProfileProperty>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Profile {
    /// Index of the property carrying the encoded textures.
    ///
    /// Falls back to the first property when none is named `textures`.
    pub fn textures_index(&self) -> Option<usize> {
        self.properties
            .iter()
            .position(|p| p.name == TEXTURES_PROPERTY)
            .or(if self.properties.is_empty() {
                None
            } else {
                Some(0)
            })
    }

    pub fn textures_property(&self) -> Option<&ProfileProperty> {
        self.textures_index().map(|i| &self.properties[i])
    }

    pub fn textures_property_mut(&mut self) -> Option<&mut ProfileProperty> {
        self.textures_index().map(move |i| &mut self.properties[i])
    }
}

/// Username lookup result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameId {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

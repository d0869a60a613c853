//! Rust client for the Mojang account, session and texture services
//!
//! Covers the read-only endpoints a skin relay needs and the codec for the
//! base64-encoded `textures` property embedded in session profiles.
//!
//! # Example
//!
//! ```no_run
//! use mojang_api::{textures, MojangClient, TextureSlot};
//!
//! # async fn example() -> Result<(), mojang_api::MojangError> {
//! let client = MojangClient::new();
//!
//! let profile = client
//!     .session_profile("069a79f444e94726a5befca90e38aaf5", true)
//!     .await?;
//! if let Some(property) = profile.textures_property() {
//!     let decoded = textures::decode(&property.value)?;
//!     if let Some(skin) = decoded.textures.get(TextureSlot::Skin) {
//!         println!("{}", skin.url);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! ## sessionserver.mojang.com
//! - `GET /session/minecraft/profile/{uuid}` - Profile with signed texture property
//!
//! ## api.mojang.com
//! - `GET /users/profiles/minecraft/{name}` - Username to UUID (optionally at a point in time)
//! - `POST /profiles/minecraft` - Batch username lookup
//! - `POST /orders/statistics` - Sales statistics
//! - `GET /user/profiles/{uuid}/names` - Name history
//!
//! ## textures.minecraft.net
//! - `GET /texture/{hash}` - Raw texture bytes

mod client;
mod error;
pub mod textures;
mod types;

pub use client::{MojangClient, MojangEndpoints};
pub use error::{MojangError, Result};
pub use textures::{TextureDecodeError, TextureEntry, TextureProperty, TextureSlot, Textures};
pub use types::{NameId, Profile, ProfileProperty};

//! GeyserMC Global API client
//!
//! Looks up Bedrock Edition players through the public
//! [GeyserMC API](https://api.geysermc.org): gamertag to XUID resolution and
//! the Java-format skin Geyser uploaded for an XUID.

mod client;
mod error;
mod types;

pub use client::GeyserClient;
pub use error::{GeyserError, Result};
pub use types::{BedrockSkin, XuidResponse};

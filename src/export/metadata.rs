use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    config::WalkConfig,
    export::png::ensure_parent_dir,
    foundation::error::WalkResult,
    walk::generator::Artwork,
};

pub const TOKEN_NAME: &str = "Random Walk NFT";
pub const TOKEN_DESCRIPTION: &str = "A unique generative art piece created from a random walk.";

/// ERC-721 token metadata document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    /// URI of the rendered image (e.g. `ipfs://...` or a relative file name).
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<TokenAttribute>,
}

/// Marketplace-style trait entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenAttribute {
    pub trait_type: String,
    pub value: serde_json::Value,
}

impl TokenAttribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

impl TokenMetadata {
    /// Metadata for an artwork whose image lives at `image_uri`.
    pub fn for_artwork(artwork: &Artwork, cfg: &WalkConfig, image_uri: impl Into<String>) -> Self {
        let mut attributes = vec![
            TokenAttribute::new("steps", artwork.path.len()),
            TokenAttribute::new("step_length", cfg.step_length),
            TokenAttribute::new("hue_offset", artwork.hue_offset),
        ];
        if let Some(seed) = artwork.seed {
            attributes.push(TokenAttribute::new("seed", seed));
        }
        Self {
            name: TOKEN_NAME.to_owned(),
            description: TOKEN_DESCRIPTION.to_owned(),
            image: image_uri.into(),
            attributes,
        }
    }

    pub fn to_json_pretty(&self) -> WalkResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> WalkResult<()> {
        ensure_parent_dir(path)?;
        let f = std::fs::File::create(path)
            .with_context(|| format!("create metadata '{}'", path.display()))?;
        serde_json::to_writer_pretty(f, self)?;
        Ok(())
    }
}

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    assets::store::AssetStore,
    foundation::core::Channel,
    foundation::error::{PackError, PackResult},
    pack::config::ExportConfig,
    pack::spec::ChannelFillSpec,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// JSON form of one channel fill.
pub enum FillRecipe {
    /// `{ "image": "metal", "channel": "B" }`
    FromChannel {
        /// Name of an image in the recipe's `images` table.
        image: String,
        /// Source channel.
        channel: Channel,
    },
    /// `{ "constant": 1.0 }`
    Constant {
        /// Constant value.
        constant: f32,
    },
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Serializable description of a packing job.
///
/// ```json
/// {
///   "images": { "metal": "metal.png", "rough": "rough.png" },
///   "channels": {
///     "B": { "image": "metal", "channel": "B" },
///     "G": { "image": "rough", "channel": "G" }
///   },
///   "mime_type": "image/png"
/// }
/// ```
pub struct PackRecipe {
    /// Image name to path, relative to the recipe's directory unless absolute.
    #[serde(default)]
    pub images: BTreeMap<String, PathBuf>,
    /// Destination channel label (`R`, `G`, `B`, `A`) to fill.
    #[serde(default)]
    pub channels: BTreeMap<String, FillRecipe>,
    /// Requested output mime type. Absent means PNG.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Export configuration overrides.
    #[serde(default)]
    pub export: ExportConfig,
}

impl PackRecipe {
    /// Parse recipe JSON.
    pub fn from_json_str(json: &str) -> PackResult<Self> {
        serde_json::from_str(json).map_err(|e| PackError::serde(format!("invalid recipe: {e}")))
    }

    /// Read and parse a recipe file.
    pub fn read(path: &Path) -> PackResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read recipe '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Load every image the recipe names into `store`.
    pub fn load_images(&self, store: &mut AssetStore) -> PackResult<()> {
        for (name, path) in &self.images {
            store.load(name, path)?;
        }
        Ok(())
    }

    /// Build the fill spec against images already in `store`.
    pub fn build(&self, store: &AssetStore) -> PackResult<ChannelFillSpec> {
        let mut spec = ChannelFillSpec::new();
        for (label, fill) in &self.channels {
            let dst = Channel::parse(label)?;
            match fill {
                FillRecipe::FromChannel { image, channel } => {
                    let asset = store.get(image)?;
                    spec.set_from_channel(dst, &asset, *channel);
                }
                FillRecipe::Constant { constant } => {
                    spec.set_constant(dst, *constant);
                }
            }
        }
        Ok(spec)
    }

    /// Requested mime type as a borrowed string.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pack/recipe.rs"]
mod tests;

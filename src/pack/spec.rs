use std::sync::Arc;

use crate::{
    assets::source::{AssetId, ImageAsset},
    foundation::core::Channel,
};

/// Value the builder writes for "white/opaque" constant fills.
pub const WHITE: f32 = 1.0;

#[derive(Clone, Debug)]
/// How one destination channel is filled.
pub enum Fill {
    /// Copy `channel` of `image` into the destination channel.
    FromChannel {
        /// Source image.
        image: Arc<ImageAsset>,
        /// Channel of `image` to read.
        channel: Channel,
    },
    /// Fill every pixel with a constant.
    Constant {
        /// Constant value, normally in `0.0..=1.0`.
        value: f32,
    },
}

impl Fill {
    /// Source image id for `FromChannel` fills.
    pub fn source_id(&self) -> Option<AssetId> {
        match self {
            Self::FromChannel { image, .. } => Some(image.id()),
            Self::Constant { .. } => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Declarative description of an RGBA image to export.
///
/// Each destination channel has at most one [`Fill`]; a channel without one is
/// "don't care". For example, to pack metallic (B of one texture) and
/// roughness (G of another) for glTF:
///
/// ```
/// # use std::sync::Arc;
/// # use chanpack::{Channel, ChannelFillSpec, ImageAsset};
/// # let px = image::DynamicImage::new_rgb8(4, 4);
/// # let metal = Arc::new(ImageAsset::new("metal", px.clone()));
/// # let rough = Arc::new(ImageAsset::new("rough", px));
/// let mut spec = ChannelFillSpec::new();
/// spec.set_from_channel(Channel::B, &metal, Channel::B)
///     .set_from_channel(Channel::G, &rough, Channel::G);
/// assert!(!spec.is_filled(Channel::A));
/// ```
///
/// Nothing is validated here; size mismatches surface when encoding.
pub struct ChannelFillSpec {
    fills: [Option<Fill>; 4],
}

impl ChannelFillSpec {
    /// Empty spec: every channel unspecified.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spec reproducing `image` as-is: channel `c` from channel `c` for each native channel.
    pub fn from_image(image: &Arc<ImageAsset>) -> Self {
        let mut spec = Self::new();
        let native = usize::from(image.channels()).min(Channel::ALL.len());
        for chan in &Channel::ALL[..native] {
            spec.set_from_channel(*chan, image, *chan);
        }
        spec
    }

    /// Fill `dst` from channel `src` of `image`, replacing any earlier fill.
    pub fn set_from_channel(
        &mut self,
        dst: Channel,
        image: &Arc<ImageAsset>,
        src: Channel,
    ) -> &mut Self {
        self.fills[dst.index()] = Some(Fill::FromChannel {
            image: Arc::clone(image),
            channel: src,
        });
        self
    }

    /// Fill `dst` with `value`, replacing any earlier fill.
    pub fn set_constant(&mut self, dst: Channel, value: f32) -> &mut Self {
        self.fills[dst.index()] = Some(Fill::Constant { value });
        self
    }

    /// Fill `dst` with all ones.
    pub fn set_white(&mut self, dst: Channel) -> &mut Self {
        self.set_constant(dst, WHITE)
    }

    /// Whether `dst` has a fill.
    pub fn is_filled(&self, dst: Channel) -> bool {
        self.fills[dst.index()].is_some()
    }

    /// Fill for `dst`, if any.
    pub fn fill(&self, dst: Channel) -> Option<&Fill> {
        self.fills[dst.index()].as_ref()
    }

    /// Present fills in channel order.
    pub fn fills(&self) -> impl Iterator<Item = (Channel, &Fill)> {
        Channel::ALL
            .iter()
            .zip(self.fills.iter())
            .filter_map(|(c, f)| f.as_ref().map(|f| (*c, f)))
    }

    /// Whether no channel is filled.
    pub fn is_empty(&self) -> bool {
        self.fills.iter().all(Option::is_none)
    }

    /// Distinct images referenced by `FromChannel` fills, first reference first.
    pub fn source_images(&self) -> Vec<Arc<ImageAsset>> {
        let mut out: Vec<Arc<ImageAsset>> = Vec::new();
        for (_, fill) in self.fills() {
            if let Fill::FromChannel { image, .. } = fill
                && !out.iter().any(|seen| seen.id() == image.id())
            {
                out.push(Arc::clone(image));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pack/spec.rs"]
mod tests;

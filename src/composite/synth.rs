use std::{collections::HashMap, sync::Arc};

use parking_lot::MutexGuard;

use crate::{
    assets::colorspace::ColorSpace,
    assets::source::ImageAsset,
    composite::engine::{ColorMode, CompositingEngine, DisplayTransform, RenderSettings},
    composite::graph::{RenderSession, RoutingGraph},
    encode::format::ContainerFormat,
    foundation::core::{Channel, Size},
    foundation::error::{PackError, PackResult},
    pack::config::ExportConfig,
    pack::spec::{ChannelFillSpec, Fill},
};

/// Build the image `spec` describes by recombining source channels.
///
/// Every source must share one size; with no sources the output is 1x1.
/// Sources are read as `NonColor` for the duration of the render and the
/// output is untagged, so channel values pass through unchanged. Original
/// colorspace tags are restored and the render session torn down on every
/// exit path.
#[tracing::instrument(skip(spec, engine, config), fields(mime = format.mime_type()))]
pub fn synthesize(
    spec: &ChannelFillSpec,
    format: ContainerFormat,
    engine: &dyn CompositingEngine,
    config: &ExportConfig,
) -> PackResult<Vec<u8>> {
    let sources = spec.source_images();
    let size = common_size(&sources)?;

    let _raw = ColorspaceOverride::acquire(&sources, ColorSpace::NonColor);
    let mut session = RenderSession::new("synth");
    build_graph(session.graph_mut(), spec, &sources, config.default_fill)?;

    let settings = RenderSettings {
        width: size.width,
        height: size.height,
        format,
        color_mode: if spec.is_filled(Channel::A) {
            ColorMode::Rgba
        } else {
            ColorMode::Rgb
        },
        display: DisplayTransform::None,
    };
    tracing::debug!(
        session = session.name(),
        width = size.width,
        height = size.height,
        sources = sources.len(),
        "rendering channel composite"
    );

    engine.render(&session, &settings)
}

fn common_size(sources: &[Arc<ImageAsset>]) -> PackResult<Size> {
    let mut iter = sources.iter();
    let Some(first) = iter.next() else {
        return Ok(Size {
            width: 1,
            height: 1,
        });
    };
    let expected = first.size();
    for img in iter {
        let found = img.size();
        if found != expected {
            return Err(PackError::DimensionMismatch {
                image: img.name().to_string(),
                expected: expected.as_tuple(),
                found: found.as_tuple(),
            });
        }
    }
    Ok(expected)
}

fn build_graph(
    graph: &mut RoutingGraph,
    spec: &ChannelFillSpec,
    sources: &[Arc<ImageAsset>],
    default_fill: f32,
) -> PackResult<()> {
    let mut separates = HashMap::with_capacity(sources.len());
    for asset in sources {
        let img = graph.add_image(Arc::clone(asset))?;
        let sep = graph.add_separate(img)?;
        separates.insert(asset.id(), sep);
    }

    let combine = graph.add_combine(default_fill)?;
    for (dst, fill) in spec.fills() {
        match fill {
            Fill::FromChannel { image, channel } => {
                let sep = separates.get(&image.id()).copied().ok_or_else(|| {
                    PackError::engine(format!("no separate node for image '{}'", image.name()))
                })?;
                graph.link(sep, *channel, combine, dst)?;
            }
            Fill::Constant { value } => graph.set_default(combine, dst, *value)?,
        }
    }
    graph.add_output(combine)?;
    Ok(())
}

/// Holds every source's exclusive lock and a forced colorspace tag; restores on drop.
///
/// `sources` must be distinct, as returned by [`ChannelFillSpec::source_images`].
struct ColorspaceOverride<'a> {
    saved: Vec<(&'a ImageAsset, ColorSpace)>,
    _locks: Vec<MutexGuard<'a, ()>>,
}

impl<'a> ColorspaceOverride<'a> {
    fn acquire(sources: &'a [Arc<ImageAsset>], tag: ColorSpace) -> Self {
        // Ascending id order, so overlapping calls lock in the same sequence.
        let mut ordered: Vec<&'a ImageAsset> = sources.iter().map(|a| &**a).collect();
        ordered.sort_by_key(|a| a.id());
        let locks = ordered.into_iter().map(ImageAsset::lock_exclusive).collect();

        let mut saved = Vec::with_capacity(sources.len());
        for asset in sources {
            saved.push((&**asset, asset.colorspace()));
            asset.set_colorspace(tag);
        }

        Self {
            saved,
            _locks: locks,
        }
    }
}

impl Drop for ColorspaceOverride<'_> {
    fn drop(&mut self) {
        for (asset, original) in self.saved.iter().rev() {
            asset.set_colorspace(*original);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/synth.rs"]
mod tests;

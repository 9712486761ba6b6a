use std::{collections::HashMap, sync::Arc};

use rayon::prelude::*;

use crate::{
    assets::colorspace::linear_to_srgb,
    assets::source::{AssetId, ImageAsset},
    composite::engine::{ColorMode, CompositingEngine, DisplayTransform, RenderSettings},
    composite::graph::{Node, RenderSession, RoutingGraph, Socket},
    encode::container::encode_dynamic,
    foundation::core::{Channel, Size},
    foundation::error::{PackError, PackResult},
};

#[derive(Clone, Copy, Debug, Default)]
/// Compositing engine that routes channels by direct per-pixel buffer arithmetic.
pub struct CpuCompositor;

impl CpuCompositor {
    /// New CPU compositor.
    pub fn new() -> Self {
        Self
    }
}

enum Slot {
    Plane(usize),
    Constant(f32),
}

impl CompositingEngine for CpuCompositor {
    fn render(&self, session: &RenderSession, settings: &RenderSettings) -> PackResult<Vec<u8>> {
        let size = Size::new(settings.width, settings.height)
            .map_err(|e| PackError::engine(format!("invalid render size: {e}")))?;
        let pixel_count = size.pixel_count()?;
        let graph = session.graph();

        let (defaults, inputs) = resolve_combine(graph)?;

        let mut planes: Vec<Vec<f32>> = Vec::new();
        let mut plane_index: HashMap<(AssetId, Channel), usize> = HashMap::new();
        let mut slots = Vec::with_capacity(4);
        for (dst, input) in inputs.iter().enumerate() {
            let Some(socket) = input else {
                slots.push(Slot::Constant(defaults[dst]));
                continue;
            };
            let asset = resolve_source(graph, socket)?;
            let key = (asset.id(), socket.channel);
            let idx = match plane_index.get(&key) {
                Some(idx) => *idx,
                None => {
                    if asset.size() != size {
                        return Err(PackError::engine(format!(
                            "source '{}' is {}x{} but render size is {}x{}",
                            asset.name(),
                            asset.width(),
                            asset.height(),
                            size.width,
                            size.height
                        )));
                    }
                    let plane = asset.read_plane(socket.channel);
                    if plane.len() != pixel_count {
                        return Err(PackError::engine(format!(
                            "source '{}' changed size during render",
                            asset.name()
                        )));
                    }
                    planes.push(plane);
                    plane_index.insert(key, planes.len() - 1);
                    planes.len() - 1
                }
            };
            slots.push(Slot::Plane(idx));
        }

        let with_alpha = settings.color_mode == ColorMode::Rgba;
        if with_alpha && !settings.format.supports_alpha() {
            tracing::warn!(
                session = session.name(),
                mime = settings.format.mime_type(),
                "container cannot store alpha, writing RGB"
            );
        }
        let channels = if with_alpha && settings.format.supports_alpha() {
            4
        } else {
            3
        };

        let row_len = (size.width as usize) * channels;
        let mut data = vec![0u8; pixel_count * channels];
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                let base = y * size.width as usize;
                for (x, px) in row.chunks_exact_mut(channels).enumerate() {
                    for (c, out) in px.iter_mut().enumerate() {
                        let v = match slots[c] {
                            Slot::Plane(idx) => planes[idx][base + x],
                            Slot::Constant(v) => v,
                        };
                        let v = if c < 3 && settings.display == DisplayTransform::Srgb {
                            linear_to_srgb(v)
                        } else {
                            v
                        };
                        *out = quantize(v);
                    }
                }
            });

        let img = match channels {
            4 => image::RgbaImage::from_raw(size.width, size.height, data)
                .map(image::DynamicImage::ImageRgba8),
            _ => image::RgbImage::from_raw(size.width, size.height, data)
                .map(image::DynamicImage::ImageRgb8),
        };
        let img =
            img.ok_or_else(|| PackError::engine("rendered buffer does not match render size"))?;

        encode_dynamic(&img, settings.format)
    }
}

fn resolve_combine(graph: &RoutingGraph) -> PackResult<([f32; 4], [Option<Socket>; 4])> {
    let out = graph
        .output()
        .ok_or_else(|| PackError::engine("routing graph has no output node"))?;
    let Node::Output { input } = graph.node(out)? else {
        return Err(PackError::engine("declared output is not an output node"));
    };
    let Node::Combine { defaults, inputs } = graph.node(*input)? else {
        return Err(PackError::engine("output must be fed by a combine node"));
    };
    Ok((*defaults, *inputs))
}

fn resolve_source<'g>(
    graph: &'g RoutingGraph,
    socket: &Socket,
) -> PackResult<&'g Arc<ImageAsset>> {
    let Node::Separate { input } = graph.node(socket.node)? else {
        return Err(PackError::engine("combine input must come from a separate node"));
    };
    let Node::ImageSource { asset } = graph.node(*input)? else {
        return Err(PackError::engine("separate node must read an image source"));
    };
    Ok(asset)
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/composite/cpu.rs"]
mod tests;

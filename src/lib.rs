//! chanpack turns a declarative RGBA channel description into encoded image bytes.
//!
//! A [`ChannelFillSpec`] says, per output channel, either "copy channel X of
//! image Y" or "fill with a constant". [`Exporter::encode`] then produces PNG or
//! JPEG bytes for it, typically to embed in a glTF file where metallic and
//! roughness must share one texture.
//!
//! # Pipeline overview
//!
//! 1. **Classify**: a spec that copies every channel straight from one image is
//!    that image; anything else needs recombination ([`is_fast_path`]).
//! 2. **Fast path**: reuse the image's backing file verbatim when possible,
//!    otherwise re-save it into a scoped temporary file ([`encode_existing`]).
//! 3. **Composite path**: route source channels through a [`RoutingGraph`] and
//!    render it with a [`CompositingEngine`] ([`synthesize`]).
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Call-scoped state**: the requested container and all restore
//!   bookkeeping live on the call stack; an [`Exporter`] can serve concurrent calls.
//! - **Sources are borrowed, never corrupted**: the temporary colorspace-tag
//!   override is restored on every exit path under a per-image exclusive lock;
//!   re-saves go to scratch files and leave the image's backing path alone.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composite;
mod encode;
mod foundation;
mod pack;

pub use assets::colorspace::{ColorSpace, linear_to_srgb, srgb_to_linear};
pub use assets::source::{AssetId, ImageAsset, PersistedMeta};
pub use assets::store::AssetStore;
pub use composite::cpu::CpuCompositor;
pub use composite::engine::{ColorMode, CompositingEngine, DisplayTransform, RenderSettings};
pub use composite::graph::{Node, NodeId, RenderSession, RoutingGraph, Socket};
pub use composite::synth::synthesize;
pub use encode::container::encode_dynamic;
pub use encode::fast_path::encode_existing;
pub use encode::format::ContainerFormat;
pub use foundation::core::{Channel, Size};
pub use foundation::error::{PackError, PackResult};
pub use foundation::scratch::{ScratchDir, unique_token};
pub use pack::classify::{fast_path_source, is_fast_path};
pub use pack::config::{ExportConfig, SCRATCH_DIR_ENV};
pub use pack::export::{Exporter, encode};
pub use pack::recipe::{FillRecipe, PackRecipe};
pub use pack::spec::{ChannelFillSpec, Fill, WHITE};

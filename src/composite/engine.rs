use crate::{
    composite::graph::RenderSession, encode::format::ContainerFormat, foundation::error::PackResult,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Channel layout of a rendered image.
pub enum ColorMode {
    /// Three channels.
    Rgb,
    /// Four channels.
    Rgba,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Transform applied to combined values before they are written.
pub enum DisplayTransform {
    /// Untagged: values are written as computed.
    None,
    /// Encode color channels with the sRGB OETF.
    Srgb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Output configuration for one render.
pub struct RenderSettings {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Encoded container of the returned bytes.
    pub format: ContainerFormat,
    /// Channel layout.
    pub color_mode: ColorMode,
    /// Output color management.
    pub display: DisplayTransform,
}

/// Executes a session's routing graph and returns encoded image bytes.
///
/// Implementations must be synchronous: `render` returns only once the image
/// is fully produced or has failed.
pub trait CompositingEngine: Send + Sync {
    /// Render `session` with `settings`.
    fn render(&self, session: &RenderSession, settings: &RenderSettings) -> PackResult<Vec<u8>>;
}

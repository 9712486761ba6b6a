#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Encoded container an export produces.
pub enum ContainerFormat {
    /// PNG, lossless. Default for unknown or missing mime types.
    #[default]
    Png,
    /// JPEG, lossy, no alpha.
    Jpeg,
}

impl ContainerFormat {
    /// Resolve a requested mime type.
    ///
    /// `image/jpeg` maps to JPEG, `image/png` to PNG, and anything else
    /// (including `None`) falls back to PNG.
    pub fn from_mime(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some("image/jpeg") => Self::Jpeg,
            _ => Self::Png,
        }
    }

    /// Canonical mime type.
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Whether the container can store an alpha channel.
    pub const fn supports_alpha(self) -> bool {
        matches!(self, Self::Png)
    }

    /// Matching `image` crate format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }

    /// Container for an `image` crate format, if it is one we emit.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;

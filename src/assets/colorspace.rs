//! Colorspace-interpretation tags carried by source images.
//!
//! The tag decides how stored channel values are read by the compositor:
//! `Srgb` values are decoded to linear light, `Linear` and `NonColor` are read
//! as stored. Raw channel extraction therefore requires `NonColor`.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// How an image's stored values are interpreted when read.
pub enum ColorSpace {
    /// sRGB-encoded color data (default for 8-bit color textures).
    #[default]
    Srgb,
    /// Scene-linear color data.
    Linear,
    /// Data that is not color (normals, roughness, masks). Never transformed.
    NonColor,
}

impl ColorSpace {
    /// Decode one stored RGB component into the compositor's working values.
    pub fn decode(self, stored: f32) -> f32 {
        match self {
            Self::Srgb => srgb_to_linear(stored),
            Self::Linear | Self::NonColor => stored,
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Srgb => "sRGB",
            Self::Linear => "Linear",
            Self::NonColor => "Non-Color",
        }
    }
}

/// sRGB EOTF per IEC 61966-2-1.
///
/// ```text
/// V <= 0.04045 → V / 12.92
/// V >  0.04045 → ((V + 0.055) / 1.055) ^ 2.4
/// ```
pub fn srgb_to_linear(encoded: f32) -> f32 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse of [`srgb_to_linear`].
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/colorspace.rs"]
mod tests;

use crate::foundation::error::{PackError, PackResult};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// One of the four output channels, with a fixed ordinal.
pub enum Channel {
    /// Red, ordinal 0.
    R = 0,
    /// Green, ordinal 1.
    G = 1,
    /// Blue, ordinal 2.
    B = 2,
    /// Alpha, ordinal 3.
    A = 3,
}

impl Channel {
    /// All channels in ordinal order.
    pub const ALL: [Channel; 4] = [Channel::R, Channel::G, Channel::B, Channel::A];

    /// Ordinal of this channel (`0..4`).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Channel for ordinal `idx`, if in range.
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Parse a single-letter channel label (`R`, `G`, `B`, `A`, case-insensitive).
    pub fn parse(label: &str) -> PackResult<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "R" => Ok(Self::R),
            "G" => Ok(Self::G),
            "B" => Ok(Self::B),
            "A" => Ok(Self::A),
            other => Err(PackError::validation(format!(
                "unknown channel '{other}' (expected R, G, B or A)"
            ))),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::R => "R",
            Self::G => "G",
            Self::B => "B",
            Self::A => "A",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Pixel dimensions of an image.
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Build a size; both sides must be non-zero.
    pub fn new(width: u32, height: u32) -> PackResult<Self> {
        if width == 0 || height == 0 {
            return Err(PackError::validation("image width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels, failing on overflow.
    pub fn pixel_count(self) -> PackResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or_else(|| PackError::validation("image pixel count overflow"))
    }

    /// Size as a `(width, height)` tuple.
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

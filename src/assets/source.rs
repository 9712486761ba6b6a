use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Context;
use parking_lot::{Mutex, MutexGuard, RwLock};

use crate::{
    assets::colorspace::ColorSpace,
    encode::{container::encode_dynamic, format::ContainerFormat},
    foundation::core::{Channel, Size},
    foundation::error::{PackError, PackResult},
};

static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Process-unique identity of an [`ImageAsset`].
///
/// Two assets never share an id, even if they share a display name.
pub struct AssetId(u64);

impl AssetId {
    fn next() -> Self {
        Self(NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where and how an image is persisted, plus whether memory has diverged from it.
pub struct PersistedMeta {
    /// Backing file, if the image has ever been saved or was loaded from disk.
    pub filepath: Option<PathBuf>,
    /// Container of the backing file. `None` for formats we do not emit.
    pub file_format: Option<ContainerFormat>,
    /// In-memory pixels have edits not yet written to `filepath`.
    pub dirty: bool,
}

#[derive(Debug)]
struct AssetState {
    pixels: image::DynamicImage,
    colorspace: ColorSpace,
    persisted: PersistedMeta,
}

/// A source image owned by an [`crate::AssetStore`] and borrowed by fill specs.
///
/// Metadata (colorspace tag, persisted path/format) is interior-mutable so
/// exporters can temporarily override and restore it through a shared handle.
/// Callers that mutate it for the duration of an operation hold
/// [`ImageAsset::lock_exclusive`] to keep overlapping calls from interleaving.
#[derive(Debug)]
pub struct ImageAsset {
    id: AssetId,
    name: String,
    exclusive: Mutex<()>,
    state: RwLock<AssetState>,
}

impl ImageAsset {
    /// Wrap in-memory pixels. The asset has no backing file yet.
    pub fn new(name: impl Into<String>, pixels: image::DynamicImage) -> Self {
        let colorspace = default_colorspace(&pixels);
        Self {
            id: AssetId::next(),
            name: name.into(),
            exclusive: Mutex::new(()),
            state: RwLock::new(AssetState {
                pixels,
                colorspace,
                persisted: PersistedMeta {
                    filepath: None,
                    file_format: None,
                    dirty: false,
                },
            }),
        }
    }

    /// Decode `path` and remember it as the backing file.
    pub fn open(name: impl Into<String>, path: &Path) -> PackResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image bytes from '{}'", path.display()))?;
        let reader = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .with_context(|| format!("sniff image format of '{}'", path.display()))?;
        let file_format = reader.format().and_then(ContainerFormat::from_image_format);
        let pixels = reader
            .decode()
            .with_context(|| format!("decode image '{}'", path.display()))?;

        let asset = Self::new(name, pixels);
        asset.set_persisted(PersistedMeta {
            filepath: Some(path.to_path_buf()),
            file_format,
            dirty: false,
        });
        Ok(asset)
    }

    /// Process-unique identity.
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.state.read().pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.state.read().pixels.height()
    }

    /// Width and height.
    pub fn size(&self) -> Size {
        let state = self.state.read();
        Size {
            width: state.pixels.width(),
            height: state.pixels.height(),
        }
    }

    /// Number of channels stored natively (1 for luma, 4 for RGBA, ...).
    pub fn channels(&self) -> u8 {
        self.state.read().pixels.color().channel_count()
    }

    /// Current colorspace-interpretation tag.
    pub fn colorspace(&self) -> ColorSpace {
        self.state.read().colorspace
    }

    /// Replace the colorspace-interpretation tag.
    pub fn set_colorspace(&self, colorspace: ColorSpace) {
        self.state.write().colorspace = colorspace;
    }

    /// Snapshot of persisted path/format/dirty metadata.
    pub fn persisted(&self) -> PersistedMeta {
        self.state.read().persisted.clone()
    }

    /// Overwrite persisted path/format/dirty metadata. Pixels are untouched.
    pub fn set_persisted(&self, meta: PersistedMeta) {
        self.state.write().persisted = meta;
    }

    /// Whether in-memory pixels differ from the backing file.
    pub fn is_dirty(&self) -> bool {
        self.state.read().persisted.dirty
    }

    /// Mutate pixels in place and mark the asset dirty.
    pub fn edit_pixels<R>(&self, f: impl FnOnce(&mut image::DynamicImage) -> R) -> R {
        let mut state = self.state.write();
        let out = f(&mut state.pixels);
        state.persisted.dirty = true;
        out
    }

    /// Write current pixels to the backing file in the backing format.
    ///
    /// Clears the dirty flag on success.
    pub fn save(&self) -> PackResult<()> {
        let mut state = self.state.write();
        let (Some(path), Some(format)) = (
            state.persisted.filepath.clone(),
            state.persisted.file_format,
        ) else {
            return Err(PackError::validation(format!(
                "image '{}' has no backing file path/format to save to",
                self.name
            )));
        };

        write_pixels(&self.name, &state.pixels, &path, format)?;
        state.persisted.dirty = false;
        Ok(())
    }

    /// Write current pixels to `path` as `format`.
    ///
    /// Persisted metadata is left alone: the backing file, its format and the
    /// dirty flag stay what they were.
    pub fn save_to(&self, path: &Path, format: ContainerFormat) -> PackResult<()> {
        let state = self.state.read();
        write_pixels(&self.name, &state.pixels, path, format)
    }

    /// Read one channel as a row-major plane of working values.
    ///
    /// Color channels pass through the current colorspace tag; alpha is
    /// always read as stored. Images with fewer channels expand the usual
    /// way (luma feeds R/G/B, missing alpha reads 1.0).
    pub fn read_plane(&self, channel: Channel) -> Vec<f32> {
        let state = self.state.read();
        let rgba = state.pixels.to_rgba32f();
        let idx = channel.index();
        let colorspace = state.colorspace;
        rgba.pixels()
            .map(|p| {
                let v = p.0[idx];
                if channel == Channel::A {
                    v
                } else {
                    colorspace.decode(v)
                }
            })
            .collect()
    }

    /// Take this image's exclusive lock for a metadata override window.
    pub fn lock_exclusive(&self) -> MutexGuard<'_, ()> {
        self.exclusive.lock()
    }
}

fn write_pixels(
    name: &str,
    pixels: &image::DynamicImage,
    path: &Path,
    format: ContainerFormat,
) -> PackResult<()> {
    let bytes = encode_dynamic(pixels, format)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write image '{name}' to '{}'", path.display()))?;
    Ok(())
}

fn default_colorspace(pixels: &image::DynamicImage) -> ColorSpace {
    match pixels {
        image::DynamicImage::ImageRgb32F(_) | image::DynamicImage::ImageRgba32F(_) => {
            ColorSpace::Linear
        }
        _ => ColorSpace::Srgb,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;

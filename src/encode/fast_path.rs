use anyhow::Context;

use crate::{
    assets::source::ImageAsset,
    encode::format::ContainerFormat,
    foundation::error::PackResult,
    foundation::scratch::ScratchDir,
    pack::config::ExportConfig,
};

/// Encode an existing image unchanged into `format`.
///
/// A clean image whose backing file is already in `format` is returned byte
/// for byte. Anything else is written into a scoped temporary file with
/// [`ImageAsset::save_to`] and read back. The image's backing path, format and
/// dirty flag are never touched, so a concurrent [`ImageAsset::save`] still
/// lands in the real backing file.
#[tracing::instrument(
    skip(image, config),
    fields(image = image.name(), id = image.id().as_u64())
)]
pub fn encode_existing(
    image: &ImageAsset,
    format: ContainerFormat,
    config: &ExportConfig,
) -> PackResult<Vec<u8>> {
    let _exclusive = image.lock_exclusive();
    let meta = image.persisted();

    if config.reuse_persisted_bytes
        && meta.file_format == Some(format)
        && !meta.dirty
        && let Some(path) = meta.filepath.as_deref()
        && path.is_file()
    {
        match std::fs::read(path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), len = bytes.len(), "reusing persisted bytes");
                return Ok(bytes);
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "backing file unreadable, re-saving instead"
                );
            }
        }
    }

    resave(image, format, config)
}

fn resave(
    image: &ImageAsset,
    format: ContainerFormat,
    config: &ExportConfig,
) -> PackResult<Vec<u8>> {
    let scratch = ScratchDir::new(config.scratch_root(), "resave")?;
    let tmp = scratch.file("img");
    image.save_to(&tmp, format)?;

    let bytes =
        std::fs::read(&tmp).with_context(|| format!("read re-saved image '{}'", tmp.display()))?;
    tracing::debug!(len = bytes.len(), mime = format.mime_type(), "re-saved image");
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/fast_path.rs"]
mod tests;

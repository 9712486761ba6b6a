use std::io::Cursor;

use anyhow::Context;

use crate::{encode::format::ContainerFormat, foundation::error::PackResult};

/// Encode `img` into `format`, narrowing the pixel layout to one the container accepts.
///
/// JPEG has no alpha and no 16-bit/float support, so it is written as 8-bit
/// luma or RGB. PNG keeps 8/16-bit layouts as-is; float images go to 16-bit.
pub fn encode_dynamic(img: &image::DynamicImage, format: ContainerFormat) -> PackResult<Vec<u8>> {
    let prepared = prepare_for(img, format);
    let src = prepared.as_ref().unwrap_or(img);

    let mut buf = Vec::new();
    src.write_to(&mut Cursor::new(&mut buf), format.image_format())
        .with_context(|| {
            format!(
                "encode {}x{} image as {}",
                src.width(),
                src.height(),
                format.mime_type()
            )
        })?;
    Ok(buf)
}

fn prepare_for(img: &image::DynamicImage, format: ContainerFormat) -> Option<image::DynamicImage> {
    use image::DynamicImage as D;

    match format {
        ContainerFormat::Jpeg => match img {
            D::ImageLuma8(_) | D::ImageRgb8(_) => None,
            D::ImageLuma16(_) | D::ImageLumaA8(_) | D::ImageLumaA16(_) => {
                Some(D::ImageLuma8(img.to_luma8()))
            }
            _ => Some(D::ImageRgb8(img.to_rgb8())),
        },
        ContainerFormat::Png => match img {
            D::ImageLuma8(_)
            | D::ImageLumaA8(_)
            | D::ImageRgb8(_)
            | D::ImageRgba8(_)
            | D::ImageLuma16(_)
            | D::ImageLumaA16(_)
            | D::ImageRgb16(_)
            | D::ImageRgba16(_) => None,
            D::ImageRgb32F(_) => Some(D::ImageRgb16(img.to_rgb16())),
            _ => Some(D::ImageRgba16(img.to_rgba16())),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/container.rs"]
mod tests;

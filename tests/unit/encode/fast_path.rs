use super::*;
use crate::foundation::scratch::ScratchDir;

fn gradient_rgba(w: u32, h: u32) -> image::DynamicImage {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x * 40) as u8, (y * 40) as u8, 200, 255 - (x * 10) as u8])
    });
    image::DynamicImage::ImageRgba8(img)
}

fn saved_png(dir: &ScratchDir) -> (ImageAsset, std::path::PathBuf) {
    let path = dir.file("src.png");
    gradient_rgba(4, 4).save(&path).unwrap();
    (ImageAsset::open("src", &path).unwrap(), path)
}

#[test]
fn clean_matching_file_is_returned_verbatim() {
    let dir = ScratchDir::new(None, "fast_verbatim").unwrap();
    let (img, path) = saved_png(&dir);
    // Trailing bytes after IEND survive only if nothing re-encodes.
    let mut on_disk = std::fs::read(&path).unwrap();
    on_disk.extend_from_slice(b"trailer");
    std::fs::write(&path, &on_disk).unwrap();

    let bytes = encode_existing(&img, ContainerFormat::Png, &ExportConfig::default()).unwrap();
    assert_eq!(bytes, on_disk);
}

#[test]
fn reuse_can_be_disabled() {
    let dir = ScratchDir::new(None, "fast_noreuse").unwrap();
    let (img, path) = saved_png(&dir);
    let mut on_disk = std::fs::read(&path).unwrap();
    on_disk.extend_from_slice(b"trailer");
    std::fs::write(&path, &on_disk).unwrap();

    let cfg = ExportConfig {
        reuse_persisted_bytes: false,
        ..ExportConfig::default()
    };
    let bytes = encode_existing(&img, ContainerFormat::Png, &cfg).unwrap();
    assert_ne!(bytes, on_disk);
    let back = image::load_from_memory(&bytes).unwrap();
    assert_eq!(back.to_rgba8(), gradient_rgba(4, 4).to_rgba8());
}

#[test]
fn format_change_resaves_and_restores_metadata() {
    let dir = ScratchDir::new(None, "fast_jpeg").unwrap();
    let (img, path) = saved_png(&dir);
    let before = img.persisted();

    let bytes = encode_existing(&img, ContainerFormat::Jpeg, &ExportConfig::default()).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    assert_eq!(img.persisted(), before);
    assert_eq!(img.persisted().filepath, Some(path));
}

#[test]
fn dirty_image_is_resaved_and_stays_dirty() {
    let dir = ScratchDir::new(None, "fast_dirty").unwrap();
    let (img, path) = saved_png(&dir);
    img.edit_pixels(|px| {
        if let image::DynamicImage::ImageRgba8(buf) = px {
            buf.put_pixel(0, 0, image::Rgba([1, 2, 3, 4]));
        }
    });
    let on_disk = std::fs::read(&path).unwrap();

    let bytes = encode_existing(&img, ContainerFormat::Png, &ExportConfig::default()).unwrap();
    let back = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(back.get_pixel(0, 0).0, [1, 2, 3, 4]);

    assert!(img.is_dirty());
    assert_eq!(std::fs::read(&path).unwrap(), on_disk);
}

#[test]
fn missing_backing_file_falls_through_to_resave() {
    let dir = ScratchDir::new(None, "fast_missing").unwrap();
    let (img, path) = saved_png(&dir);
    std::fs::remove_file(&path).unwrap();

    let bytes = encode_existing(&img, ContainerFormat::Png, &ExportConfig::default()).unwrap();
    let back = image::load_from_memory(&bytes).unwrap();
    assert_eq!(back.to_rgba8(), gradient_rgba(4, 4).to_rgba8());
    assert!(!path.exists());
}

#[test]
fn in_memory_image_without_file_is_saved_to_scratch() {
    let scratch_root = ScratchDir::new(None, "fast_root").unwrap();
    let img = ImageAsset::new("mem", gradient_rgba(2, 3));
    let cfg = ExportConfig {
        scratch_root: Some(scratch_root.path().to_path_buf()),
        ..ExportConfig::default()
    };

    let bytes = encode_existing(&img, ContainerFormat::Png, &cfg).unwrap();
    let back = image::load_from_memory(&bytes).unwrap();
    assert_eq!((back.width(), back.height()), (2, 3));
    assert_eq!(img.persisted().filepath, None);
    // Per-call scratch directories are gone once the call returns.
    assert_eq!(std::fs::read_dir(scratch_root.path()).unwrap().count(), 0);
}

#[test]
fn saves_during_concurrent_resaves_land_in_the_backing_file() {
    let dir = ScratchDir::new(None, "fast_concurrent_save").unwrap();
    let (img, path) = saved_png(&dir);
    let cfg = ExportConfig {
        scratch_root: Some(dir.path().to_path_buf()),
        ..ExportConfig::default()
    };

    std::thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..300 {
                let bytes = encode_existing(&img, ContainerFormat::Jpeg, &cfg).unwrap();
                assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
            }
        });
        s.spawn(|| {
            for v in 0..300u32 {
                let v = (v % 256) as u8;
                img.edit_pixels(|px| {
                    if let image::DynamicImage::ImageRgba8(buf) = px {
                        buf.put_pixel(0, 0, image::Rgba([v, v, v, 255]));
                    }
                });
                img.save().unwrap();
                assert_eq!(img.persisted().filepath.as_deref(), Some(path.as_path()));

                let on_disk = image::open(&path).unwrap().to_rgba8();
                assert_eq!(on_disk.get_pixel(0, 0).0, [v, v, v, 255]);
            }
        });
    });

    assert!(!img.is_dirty());
    assert_eq!(img.persisted().file_format, Some(ContainerFormat::Png));
}

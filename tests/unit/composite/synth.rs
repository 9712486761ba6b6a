use parking_lot::Mutex;

use super::*;
use crate::composite::cpu::CpuCompositor;

/// Records what it was asked to render, then fails.
#[derive(Default)]
struct FailingEngine {
    seen: Mutex<Vec<(RenderSettings, Vec<ColorSpace>, String)>>,
}

impl CompositingEngine for FailingEngine {
    fn render(&self, session: &RenderSession, settings: &RenderSettings) -> PackResult<Vec<u8>> {
        let tags = session
            .graph()
            .nodes()
            .iter()
            .filter_map(|n| match n {
                crate::composite::graph::Node::ImageSource { asset } => Some(asset.colorspace()),
                _ => None,
            })
            .collect();
        self.seen
            .lock()
            .push((*settings, tags, session.name().to_string()));
        Err(PackError::engine("render exploded"))
    }
}

fn asset(name: &str, w: u32, h: u32, colorspace: ColorSpace) -> Arc<ImageAsset> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x * 17) as u8, (y * 31) as u8, (x * y) as u8, 200])
    });
    let a = ImageAsset::new(name, image::DynamicImage::ImageRgba8(img));
    a.set_colorspace(colorspace);
    Arc::new(a)
}

#[test]
fn engine_sees_non_color_sources_and_tags_are_restored_after_failure() {
    let a = asset("a", 4, 4, ColorSpace::Srgb);
    let b = asset("b", 4, 4, ColorSpace::Linear);
    let mut spec = ChannelFillSpec::new();
    spec.set_from_channel(Channel::R, &a, Channel::G)
        .set_from_channel(Channel::G, &b, Channel::R)
        .set_from_channel(Channel::B, &a, Channel::B);

    let engine = FailingEngine::default();
    let err = synthesize(&spec, ContainerFormat::Png, &engine, &ExportConfig::default())
        .unwrap_err();
    assert!(matches!(err, PackError::Engine(_)));

    let seen = engine.seen.lock();
    assert_eq!(seen.len(), 1);
    let (settings, tags, session) = &seen[0];
    assert_eq!(tags, &vec![ColorSpace::NonColor, ColorSpace::NonColor]);
    assert_eq!((settings.width, settings.height), (4, 4));
    assert_eq!(settings.color_mode, ColorMode::Rgb);
    assert_eq!(settings.display, DisplayTransform::None);
    assert!(session.starts_with("chanpack:synth:"));

    assert_eq!(a.colorspace(), ColorSpace::Srgb);
    assert_eq!(b.colorspace(), ColorSpace::Linear);
}

#[test]
fn tags_are_restored_after_success() {
    let a = asset("a", 2, 2, ColorSpace::Srgb);
    let mut spec = ChannelFillSpec::new();
    spec.set_from_channel(Channel::R, &a, Channel::G);

    synthesize(
        &spec,
        ContainerFormat::Png,
        &CpuCompositor::new(),
        &ExportConfig::default(),
    )
    .unwrap();
    assert_eq!(a.colorspace(), ColorSpace::Srgb);
}

#[test]
fn dimension_mismatch_fails_before_touching_sources() {
    let a = asset("a", 4, 4, ColorSpace::Srgb);
    let b = asset("b", 8, 8, ColorSpace::Srgb);
    let mut spec = ChannelFillSpec::new();
    spec.set_from_channel(Channel::R, &a, Channel::R)
        .set_from_channel(Channel::G, &b, Channel::G);

    let engine = FailingEngine::default();
    let err = synthesize(&spec, ContainerFormat::Png, &engine, &ExportConfig::default())
        .unwrap_err();
    match err {
        PackError::DimensionMismatch {
            image,
            expected,
            found,
        } => {
            assert_eq!(image, "b");
            assert_eq!(expected, (4, 4));
            assert_eq!(found, (8, 8));
        }
        other => panic!("expected DimensionMismatch, got {other}"),
    }
    assert!(engine.seen.lock().is_empty());
}

#[test]
fn empty_spec_renders_one_white_pixel() {
    let bytes = synthesize(
        &ChannelFillSpec::new(),
        ContainerFormat::Png,
        &CpuCompositor::new(),
        &ExportConfig::default(),
    )
    .unwrap();
    let out = image::load_from_memory(&bytes).unwrap();
    assert_eq!((out.width(), out.height()), (1, 1));
    assert_eq!(out.color(), image::ColorType::Rgb8);
    assert_eq!(out.to_rgb8().into_raw(), vec![255, 255, 255]);
}

#[test]
fn constant_alpha_requests_rgba_output() {
    let mut spec = ChannelFillSpec::new();
    spec.set_white(Channel::A).set_constant(Channel::R, 0.0);

    let engine = FailingEngine::default();
    let _ = synthesize(&spec, ContainerFormat::Png, &engine, &ExportConfig::default());
    assert_eq!(engine.seen.lock()[0].0.color_mode, ColorMode::Rgba);

    let bytes = synthesize(
        &spec,
        ContainerFormat::Png,
        &CpuCompositor::new(),
        &ExportConfig::default(),
    )
    .unwrap();
    let out = image::load_from_memory(&bytes).unwrap();
    assert_eq!(out.to_rgba8().into_raw(), vec![0, 255, 255, 255]);
}

#[test]
fn default_fill_is_configurable() {
    let a = asset("a", 1, 1, ColorSpace::NonColor);
    let mut spec = ChannelFillSpec::new();
    spec.set_from_channel(Channel::R, &a, Channel::A);
    let cfg = ExportConfig {
        default_fill: 0.0,
        ..ExportConfig::default()
    };

    let bytes = synthesize(&spec, ContainerFormat::Png, &CpuCompositor::new(), &cfg).unwrap();
    let out = image::load_from_memory(&bytes).unwrap();
    assert_eq!(out.to_rgb8().into_raw(), vec![200, 0, 0]);
}

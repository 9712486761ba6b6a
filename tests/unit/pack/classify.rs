use super::*;
use crate::foundation::core::Channel;

fn asset(name: &str) -> Arc<ImageAsset> {
    Arc::new(ImageAsset::new(name, image::DynamicImage::new_rgba8(2, 2)))
}

#[test]
fn from_image_is_fast_path() {
    let a = asset("a");
    let spec = ChannelFillSpec::from_image(&a);
    assert_eq!(fast_path_source(&spec).map(|i| i.id()), Some(a.id()));
}

#[test]
fn channel_aligned_subset_is_fast_path() {
    let a = asset("a");
    let mut spec = ChannelFillSpec::new();
    spec.set_from_channel(Channel::G, &a, Channel::G);
    assert!(is_fast_path(&spec));
}

#[test]
fn channel_mismatch_is_not_fast_path() {
    let a = asset("a");
    let mut spec = ChannelFillSpec::new();
    spec.set_from_channel(Channel::R, &a, Channel::G);
    assert!(!is_fast_path(&spec));
}

#[test]
fn two_images_are_not_fast_path_even_when_aligned() {
    let a = asset("a");
    let b = asset("b");
    let mut spec = ChannelFillSpec::new();
    spec.set_from_channel(Channel::R, &a, Channel::R)
        .set_from_channel(Channel::G, &b, Channel::G);
    assert!(!is_fast_path(&spec));
}

#[test]
fn same_name_different_assets_are_not_fast_path() {
    let a = asset("tex");
    let b = asset("tex");
    let mut spec = ChannelFillSpec::new();
    spec.set_from_channel(Channel::R, &a, Channel::R)
        .set_from_channel(Channel::G, &b, Channel::G);
    assert!(!is_fast_path(&spec));
}

#[test]
fn constants_and_empty_specs_are_not_fast_path() {
    let a = asset("a");
    let mut spec = ChannelFillSpec::from_image(&a);
    spec.set_white(Channel::A);
    assert!(!is_fast_path(&spec));
    assert!(!is_fast_path(&ChannelFillSpec::new()));
}

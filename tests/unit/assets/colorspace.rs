use super::*;

const EPSILON: f32 = 1e-5;

#[test]
fn srgb_known_values() {
    assert!((srgb_to_linear(0.0) - 0.0).abs() < EPSILON);
    assert!((srgb_to_linear(1.0) - 1.0).abs() < EPSILON);
    // Mid-gray sRGB 0.5 is ~0.214 linear.
    assert!((srgb_to_linear(0.5) - 0.214041).abs() < 0.001);
}

#[test]
fn srgb_roundtrip_preserves_values() {
    for v in [0.0f32, 0.001, 0.01, 0.1, 0.5, 0.9, 1.0] {
        let back = srgb_to_linear(linear_to_srgb(v));
        assert!((v - back).abs() < EPSILON, "roundtrip failed for {v}");
    }
}

#[test]
fn non_color_and_linear_read_raw() {
    assert_eq!(ColorSpace::NonColor.decode(0.5), 0.5);
    assert_eq!(ColorSpace::Linear.decode(0.5), 0.5);
    assert!(ColorSpace::Srgb.decode(0.5) < 0.25);
}

use std::sync::Arc;

use crate::{
    assets::source::ImageAsset,
    pack::spec::{ChannelFillSpec, Fill},
};

/// Existing image that `spec` describes pixel-for-pixel, if there is one.
///
/// That is the case when every present fill copies a channel into the same
/// channel (`R <- R`, `G <- G`, ...) of one single image. An empty spec or
/// any constant fill never qualifies.
pub fn fast_path_source(spec: &ChannelFillSpec) -> Option<Arc<ImageAsset>> {
    let mut shared: Option<&Arc<ImageAsset>> = None;
    for (dst, fill) in spec.fills() {
        match fill {
            Fill::FromChannel { image, channel } => {
                if *channel != dst {
                    return None;
                }
                match shared {
                    None => shared = Some(image),
                    Some(prev) if prev.id() == image.id() => {}
                    Some(_) => return None,
                }
            }
            Fill::Constant { .. } => return None,
        }
    }
    shared.cloned()
}

/// Whether `spec` can reuse an existing image instead of synthesizing one.
pub fn is_fast_path(spec: &ChannelFillSpec) -> bool {
    fast_path_source(spec).is_some()
}

#[cfg(test)]
#[path = "../../tests/unit/pack/classify.rs"]
mod tests;

use std::sync::Arc;

use crate::{
    composite::cpu::CpuCompositor,
    composite::engine::CompositingEngine,
    composite::synth::synthesize,
    encode::fast_path::encode_existing,
    encode::format::ContainerFormat,
    foundation::error::PackResult,
    pack::classify::fast_path_source,
    pack::config::ExportConfig,
    pack::spec::ChannelFillSpec,
};

#[derive(Clone)]
/// Turns fill specs into encoded image bytes.
///
/// An exporter is stateless between calls: the requested container and all
/// restore bookkeeping live on the call stack, so one exporter can serve
/// concurrent calls.
pub struct Exporter {
    engine: Arc<dyn CompositingEngine>,
    config: ExportConfig,
}

impl std::fmt::Debug for Exporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("engine_ptr", &Arc::as_ptr(&self.engine))
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl Exporter {
    /// Exporter backed by the CPU compositor.
    pub fn new(config: ExportConfig) -> Self {
        Self::with_engine(Arc::new(CpuCompositor::new()), config)
    }

    /// Exporter backed by a custom compositing engine.
    pub fn with_engine(engine: Arc<dyn CompositingEngine>, config: ExportConfig) -> Self {
        Self { engine, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Encode `spec` into the container named by `mime_type` (PNG when absent or unknown).
    ///
    /// Specs that merely reproduce one existing image reuse it; everything else
    /// is synthesized. The call either returns complete bytes or an error.
    #[tracing::instrument(skip(self, spec))]
    pub fn encode(&self, spec: ChannelFillSpec, mime_type: Option<&str>) -> PackResult<Vec<u8>> {
        let format = ContainerFormat::from_mime(mime_type);
        match fast_path_source(&spec) {
            Some(image) => {
                tracing::debug!(image = image.name(), mime = format.mime_type(), "fast path");
                encode_existing(&image, format, &self.config)
            }
            None => {
                tracing::debug!(mime = format.mime_type(), "composite path");
                synthesize(&spec, format, self.engine.as_ref(), &self.config)
            }
        }
    }
}

/// Encode `spec` with a default [`Exporter`].
pub fn encode(spec: ChannelFillSpec, mime_type: Option<&str>) -> PackResult<Vec<u8>> {
    Exporter::default().encode(spec, mime_type)
}

impl ChannelFillSpec {
    /// Consume this spec and encode it with a default [`Exporter`].
    pub fn encode(self, mime_type: Option<&str>) -> PackResult<Vec<u8>> {
        encode(self, mime_type)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pack/export.rs"]
mod tests;

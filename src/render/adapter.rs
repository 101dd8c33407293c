use resvg::tiny_skia;

use crate::source::SourceItem;

/// Premultiplied RGBA8 raster produced by a [`RenderAdapter`].
pub type RasterImage = tiny_skia::Pixmap;

/// Why a single source could not be rasterized. Always recoverable at the batch level.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("invalid raster size {width}x{height}: {reason}")]
    InvalidSize {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("failed to allocate {width}x{height} raster")]
    Allocation { width: u32, height: u32 },

    #[error(
        "renderer returned {got_width}x{got_height}, expected {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        got_width: u32,
        got_height: u32,
    },

    #[error("render timed out after {millis} ms")]
    Timeout { millis: u128 },

    #[error("renderer panicked")]
    Panicked,
}

/// Converts one vector source into a raster of exactly `width` x `height` pixels.
///
/// Implementations must not resize silently: any other output size is rejected by the composer.
pub trait RenderAdapter: Send + Sync {
    fn render(
        &self,
        source: &SourceItem,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, RenderError>;
}

impl<R: RenderAdapter + ?Sized> RenderAdapter for &R {
    fn render(
        &self,
        source: &SourceItem,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, RenderError> {
        (**self).render(source, width, height)
    }
}

impl<R: RenderAdapter + ?Sized> RenderAdapter for std::sync::Arc<R> {
    fn render(
        &self,
        source: &SourceItem,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, RenderError> {
        (**self).render(source, width, height)
    }
}

impl<R: RenderAdapter + ?Sized> RenderAdapter for Box<R> {
    fn render(
        &self,
        source: &SourceItem,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, RenderError> {
        (**self).render(source, width, height)
    }
}

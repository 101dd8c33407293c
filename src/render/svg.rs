use std::sync::Arc;

use resvg::tiny_skia;

use crate::{
    config::SheetConfig,
    render::adapter::{RasterImage, RenderAdapter, RenderError},
    render::fonts::{build_fontdb, svg_options},
    source::SourceItem,
};

/// Largest raster edge the renderer will allocate.
pub const MAX_RASTER_DIM: u32 = 16_384;

/// [`RenderAdapter`] backed by `usvg` parsing and `resvg` rasterization.
///
/// The drawing is scaled to fit the requested size without distortion, centered horizontally
/// and aligned to the bottom edge. Uncovered pixels stay transparent.
#[derive(Clone)]
pub struct SvgRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
    default_family: String,
    antialias: bool,
}

impl std::fmt::Debug for SvgRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRenderer")
            .field("font_faces", &self.fontdb.len())
            .field("default_family", &self.default_family)
            .field("antialias", &self.antialias)
            .finish()
    }
}

impl SvgRenderer {
    /// Renderer with its own font database built from system fonts and `cfg.font_dirs`.
    pub fn new(cfg: &SheetConfig) -> Self {
        Self::with_fontdb(build_fontdb(&cfg.font_dirs), cfg)
    }

    /// Renderer sharing an existing font database.
    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>, cfg: &SheetConfig) -> Self {
        Self {
            fontdb,
            default_family: cfg.font_family.clone(),
            antialias: cfg.antialias,
        }
    }

    pub fn fontdb(&self) -> &Arc<usvg::fontdb::Database> {
        &self.fontdb
    }

    /// Parse SVG bytes. `origin` is only used for error messages and relative resources.
    pub fn parse(&self, bytes: &[u8], origin: &std::path::Path) -> Result<usvg::Tree, RenderError> {
        let opts = svg_options(
            self.fontdb.clone(),
            &self.default_family,
            self.antialias,
            origin.parent().map(|p| p.to_path_buf()),
        );
        usvg::Tree::from_data(bytes, &opts).map_err(|e| RenderError::Parse {
            path: origin.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl RenderAdapter for SvgRenderer {
    fn render(
        &self,
        source: &SourceItem,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, RenderError> {
        let bytes = std::fs::read(&source.path).map_err(|e| RenderError::Read {
            path: source.path.display().to_string(),
            source: e,
        })?;
        let tree = self.parse(&bytes, &source.path)?;
        rasterize_fit(&tree, width, height)
    }
}

/// Rasterize `tree` into a `width` x `height` pixmap, preserving its aspect ratio.
pub fn rasterize_fit(tree: &usvg::Tree, width: u32, height: u32) -> Result<RasterImage, RenderError> {
    let invalid = |reason: &str| RenderError::InvalidSize {
        width,
        height,
        reason: reason.to_string(),
    };
    if width == 0 || height == 0 {
        return Err(invalid("target must be non-empty"));
    }
    if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
        return Err(invalid(&format!(
            "exceeds {MAX_RASTER_DIM}x{MAX_RASTER_DIM}"
        )));
    }

    let size = tree.size();
    let (src_w, src_h) = (size.width(), size.height());
    if !src_w.is_finite() || !src_h.is_finite() || src_w <= 0.0 || src_h <= 0.0 {
        return Err(invalid("svg has invalid width/height"));
    }

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RenderError::Allocation { width, height })?;

    let (w, h) = (width as f32, height as f32);
    let scale = (w / src_w).min(h / src_h);
    let translate_x = (w - src_w * scale) * 0.5;
    let translate_y = h - src_h * scale;
    let xform = tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, translate_x, translate_y);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap)
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;

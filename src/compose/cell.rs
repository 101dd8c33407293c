use std::{panic::AssertUnwindSafe, sync::Arc};

use resvg::tiny_skia;

use crate::{
    compose::canvas::Canvas,
    compose::label::{LabelPainter, label_text},
    config::{LabelMode, SheetConfig},
    foundation::core::{PixelRect, Rgba8},
    foundation::error::{SheetError, SheetResult},
    layout::grid::{CellGeometry, GridShape},
    render::adapter::{RasterImage, RenderAdapter, RenderError},
    source::SourceItem,
};

/// Final state of one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    Rendered,
    Failed { reason: String },
}

/// Per-item record produced by the composer. Never retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemResult {
    /// Discovery index; fixes the item's cell.
    pub index: usize,
    /// Label drawn in the cell, if the mode draws one.
    pub label: Option<String>,
    pub outcome: ItemOutcome,
}

impl ItemResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Rendered)
    }
}

/// A finished cell: its result plus the cell-sized pixels to blit into the canvas.
pub struct ComposedCell {
    pub result: ItemResult,
    pub pixels: tiny_skia::Pixmap,
}

/// Composes single cells into private buffers.
///
/// Holds only immutable state, so one composer can be shared by every worker of a run.
#[derive(Clone)]
pub struct CellComposer {
    mode: LabelMode,
    shape: GridShape,
    geometry: CellGeometry,
    background: Rgba8,
    border: Rgba8,
    antialias: bool,
    labels: LabelPainter,
}

impl CellComposer {
    pub fn new(
        cfg: &SheetConfig,
        shape: GridShape,
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> SheetResult<Self> {
        cfg.validate()?;
        Ok(Self {
            mode: cfg.label_mode,
            shape,
            geometry: CellGeometry::from_config(cfg)?,
            background: Rgba8 {
                a: 255,
                ..cfg.background
            },
            border: cfg.border_color,
            antialias: cfg.antialias,
            labels: LabelPainter::new(cfg, fontdb),
        })
    }

    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Compose the cell for `item` at `index` and blit it into `canvas`.
    pub fn compose_cell<R: RenderAdapter + ?Sized>(
        &self,
        canvas: &mut Canvas,
        item: &SourceItem,
        index: usize,
        adapter: &R,
    ) -> SheetResult<ItemResult> {
        let cell = self.compose(item, index, adapter)?;
        canvas.blit_cell(index, &cell.pixels)?;
        Ok(cell.result)
    }

    /// Compose the cell for `item` at `index` into a fresh buffer.
    ///
    /// Render failures are recorded in the returned [`ItemResult`]; only failing to allocate the
    /// cell buffer itself is an error.
    pub fn compose<R: RenderAdapter + ?Sized>(
        &self,
        item: &SourceItem,
        index: usize,
        adapter: &R,
    ) -> SheetResult<ComposedCell> {
        let g = &self.geometry;
        let mut pixels = tiny_skia::Pixmap::new(g.cell_width, g.cell_height).ok_or_else(|| {
            SheetError::allocation(format!(
                "failed to allocate {}x{} cell buffer",
                g.cell_width, g.cell_height
            ))
        })?;
        pixels.fill(self.background.to_skia());

        let label = label_text(self.mode, index, item);
        if let (Some(text), Some((x, baseline))) = (label.as_deref(), g.label_origin)
            && let Err(e) = self.labels.draw(&mut pixels, text, x, baseline)
        {
            tracing::warn!(index, error = %e, "label not drawn");
        }

        let outcome = match self.render_preview(item, adapter) {
            Ok(preview) => {
                if self.mode.draws_label() {
                    self.fill(&mut pixels, g.content_rect(), self.background);
                }
                let (x, y) = g.preview_origin(preview.height());
                pixels.draw_pixmap(
                    x as i32,
                    y as i32,
                    preview.as_ref(),
                    &self.pixmap_paint(),
                    tiny_skia::Transform::identity(),
                    None,
                );
                ItemOutcome::Rendered
            }
            Err(e) => ItemOutcome::Failed {
                reason: e.to_string(),
            },
        };

        self.draw_border(&mut pixels);

        Ok(ComposedCell {
            result: ItemResult {
                index,
                label,
                outcome,
            },
            pixels,
        })
    }

    fn render_preview<R: RenderAdapter + ?Sized>(
        &self,
        item: &SourceItem,
        adapter: &R,
    ) -> Result<RasterImage, RenderError> {
        let (w, h) = (self.geometry.content_width, self.geometry.content_height);
        let preview = std::panic::catch_unwind(AssertUnwindSafe(|| adapter.render(item, w, h)))
            .map_err(|_| RenderError::Panicked)??;
        if preview.width() != w || preview.height() != h {
            return Err(RenderError::DimensionMismatch {
                expected_width: w,
                expected_height: h,
                got_width: preview.width(),
                got_height: preview.height(),
            });
        }
        Ok(preview)
    }

    // Outermost pixel ring of the cell.
    fn draw_border(&self, pixels: &mut tiny_skia::Pixmap) {
        let (w, h) = (pixels.width(), pixels.height());
        for edge in [
            PixelRect::new(0, 0, w, 1),
            PixelRect::new(0, h - 1, w, 1),
            PixelRect::new(0, 0, 1, h),
            PixelRect::new(w - 1, 0, 1, h),
        ] {
            self.fill(pixels, edge, self.border);
        }
    }

    fn fill(&self, pixels: &mut tiny_skia::Pixmap, rect: PixelRect, color: Rgba8) {
        let Some(rect) = rect.to_skia() else {
            return;
        };
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = self.antialias;
        // Cell-aligned integer rects: the paint replaces, it does not blend.
        paint.blend_mode = tiny_skia::BlendMode::Source;
        pixels.fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
    }

    fn pixmap_paint(&self) -> tiny_skia::PixmapPaint {
        tiny_skia::PixmapPaint {
            quality: if self.antialias {
                tiny_skia::FilterQuality::Bilinear
            } else {
                tiny_skia::FilterQuality::Nearest
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/cell.rs"]
mod tests;

use resvg::tiny_skia;

use crate::{
    foundation::core::{PixelRect, Rgba8},
    foundation::error::{SheetError, SheetResult},
    layout::grid::GridShape,
};

/// Largest canvas edge accepted before allocation is attempted.
pub const MAX_CANVAS_DIM: u32 = 65_535;

/// The output raster: one disjoint `cell_width` x `cell_height` rectangle per grid slot.
///
/// Pixels are premultiplied RGBA8. Cells are written only through [`Canvas::blit_cell`], which
/// replaces a whole cell rectangle at once.
#[derive(Clone)]
pub struct Canvas {
    pixmap: tiny_skia::Pixmap,
    shape: GridShape,
    cell_width: u32,
    cell_height: u32,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("shape", &self.shape)
            .field("cell_width", &self.cell_width)
            .field("cell_height", &self.cell_height)
            .finish()
    }
}

impl Canvas {
    /// Allocate the canvas for `shape` and fill it with an opaque `background`.
    pub fn new(
        shape: GridShape,
        cell_width: u32,
        cell_height: u32,
        background: Rgba8,
    ) -> SheetResult<Self> {
        let width = shape.columns.checked_mul(cell_width);
        let height = shape.rows.checked_mul(cell_height);
        let (Some(width), Some(height)) = (width, height) else {
            return Err(SheetError::allocation(format!(
                "canvas size overflows for {}x{} cells of {cell_width}x{cell_height}",
                shape.columns, shape.rows
            )));
        };
        if width > MAX_CANVAS_DIM || height > MAX_CANVAS_DIM {
            return Err(SheetError::allocation(format!(
                "canvas {width}x{height} exceeds {MAX_CANVAS_DIM}x{MAX_CANVAS_DIM}"
            )));
        }

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            SheetError::allocation(format!("failed to allocate {width}x{height} canvas"))
        })?;
        pixmap.fill(Rgba8 { a: 255, ..background }.to_skia());

        Ok(Self {
            pixmap,
            shape,
            cell_width,
            cell_height,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn cell_rect(&self, index: usize) -> PixelRect {
        self.shape.cell_rect(index, self.cell_width, self.cell_height)
    }

    /// Read-only view of the premultiplied pixels.
    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA8 at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Replace the cell rectangle of `index` with `cell`.
    pub fn blit_cell(&mut self, index: usize, cell: &tiny_skia::Pixmap) -> SheetResult<()> {
        if index as u64 >= self.shape.capacity() {
            return Err(SheetError::validation(format!(
                "cell index {index} outside {}x{} grid",
                self.shape.columns, self.shape.rows
            )));
        }
        if cell.width() != self.cell_width || cell.height() != self.cell_height {
            return Err(SheetError::validation(format!(
                "cell buffer is {}x{}, expected {}x{}",
                cell.width(),
                cell.height(),
                self.cell_width,
                self.cell_height
            )));
        }

        let rect = self.cell_rect(index);
        let stride = self.pixmap.width() as usize * 4;
        let row_len = self.cell_width as usize * 4;
        let dst = self.pixmap.data_mut();
        for (r, src_row) in cell.data().chunks_exact(row_len).enumerate() {
            let start = (rect.y as usize + r) * stride + rect.x as usize * 4;
            dst[start..start + row_len].copy_from_slice(src_row);
        }
        Ok(())
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = image::RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/canvas.rs"]
mod tests;

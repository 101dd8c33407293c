use crate::{
    config::{LabelMode, SheetConfig},
    foundation::core::PixelRect,
    foundation::error::{SheetError, SheetResult},
};

/// Column/row counts of the output grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridShape {
    pub columns: u32,
    pub rows: u32,
}

impl GridShape {
    /// Number of cells in the grid, including trailing empty slots.
    pub fn capacity(self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// `(column, row)` of the item at `index`, row-major.
    pub fn position(self, index: usize) -> (u32, u32) {
        let cols = self.columns as usize;
        ((index % cols) as u32, (index / cols) as u32)
    }

    /// Top-left pixel of the item's cell.
    pub fn cell_origin(self, index: usize, cell_width: u32, cell_height: u32) -> (u32, u32) {
        let (col, row) = self.position(index);
        (col * cell_width, row * cell_height)
    }

    /// Full canvas rectangle occupied by the item's cell.
    pub fn cell_rect(self, index: usize, cell_width: u32, cell_height: u32) -> PixelRect {
        let (x, y) = self.cell_origin(index, cell_width, cell_height);
        PixelRect::new(x, y, cell_width, cell_height)
    }
}

/// Compute a square-ish grid for `item_count` items.
///
/// `columns = ceil(sqrt(n))`, `rows = ceil(n / columns)`. When `n` is not a perfect square the
/// grid is never taller than it is wide.
pub fn compute_grid_shape(item_count: usize) -> SheetResult<GridShape> {
    if item_count == 0 {
        return Err(SheetError::EmptyInput);
    }
    let n = item_count as u64;
    let columns = ceil_sqrt(n);
    let rows = n.div_ceil(columns);

    let columns = u32::try_from(columns)
        .map_err(|_| SheetError::validation(format!("too many items: {item_count}")))?;
    let rows = u32::try_from(rows)
        .map_err(|_| SheetError::validation(format!("too many items: {item_count}")))?;
    Ok(GridShape { columns, rows })
}

fn ceil_sqrt(n: u64) -> u64 {
    let r = n.isqrt();
    if r * r == n { r } else { r + 1 }
}

/// Pixel geometry shared by every cell of a run, relative to the cell's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellGeometry {
    pub cell_width: u32,
    pub cell_height: u32,
    pub content_width: u32,
    pub content_height: u32,
    /// Left edge of the content area (padding plus centering offset).
    pub content_x: u32,
    /// Top edge of the content area, below the label band when there is one.
    pub content_y: u32,
    /// Horizontal offset that centers the content area between the paddings.
    pub x_offset: u32,
    /// Label start `x` and baseline `y`; `None` when the mode draws no label.
    pub label_origin: Option<(u32, u32)>,
}

impl CellGeometry {
    /// Geometry for the configured cell size, paddings, font size and label mode.
    pub fn from_config(cfg: &SheetConfig) -> SheetResult<Self> {
        compute_cell_geometry(
            cfg.cell_width,
            cfg.cell_height,
            cfg.padding,
            cfg.font_size,
            cfg.label_gap,
            cfg.label_mode,
        )
    }

    /// Bottom edge of the content area; previews are aligned against it.
    pub fn content_bottom(&self) -> u32 {
        self.content_y + self.content_height
    }

    /// Content area relative to the cell.
    pub fn content_rect(&self) -> PixelRect {
        PixelRect::new(
            self.content_x,
            self.content_y,
            self.content_width,
            self.content_height,
        )
    }

    /// Top-left corner for a preview of `preview_height`, bottom-aligned in the content area.
    pub fn preview_origin(&self, preview_height: u32) -> (u32, u32) {
        let y = self.content_bottom().saturating_sub(preview_height);
        (self.content_x, y.max(self.content_y))
    }
}

/// Lay out one cell.
///
/// With a label, a band of `label_height + label_gap` is reserved above the content area and the
/// content shrinks by the band on both axes. Without one, everything inside the padding belongs
/// to the preview.
pub fn compute_cell_geometry(
    cell_width: u32,
    cell_height: u32,
    padding: u32,
    label_height: u32,
    label_gap: u32,
    mode: LabelMode,
) -> SheetResult<CellGeometry> {
    let band = match mode {
        LabelMode::None => 0,
        LabelMode::Numerate | LabelMode::FileName => label_height
            .checked_add(label_gap)
            .ok_or_else(|| SheetError::config("label band overflows"))?,
    };

    let inner = |side: u32, what: &str| -> SheetResult<u32> {
        padding
            .checked_mul(2)
            .and_then(|p| p.checked_add(band))
            .and_then(|used| side.checked_sub(used))
            .filter(|v| *v > 0)
            .ok_or_else(|| {
                SheetError::config(format!(
                    "cell {what} {side} leaves no room for content \
                     (padding {padding}, label band {band})"
                ))
            })
    };
    let content_width = inner(cell_width, "width")?;
    let content_height = inner(cell_height, "height")?;

    let x_offset = (cell_width - 2 * padding - content_width) / 2;
    let label_origin = match mode {
        LabelMode::None => None,
        LabelMode::Numerate | LabelMode::FileName => Some((padding, padding + label_height)),
    };

    Ok(CellGeometry {
        cell_width,
        cell_height,
        content_width,
        content_height,
        content_x: padding + x_offset,
        content_y: padding + band,
        x_offset,
        label_origin,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;

//! svgsheet renders a set of SVG files into one labeled contact-sheet image.
//!
//! # Pipeline overview
//!
//! 1. **Discover**: [`discover_sources`] walks a directory for `.svg` files (sorted, recursive).
//! 2. **Lay out**: [`compute_grid_shape`] picks `ceil(sqrt(n))` columns, and
//!    [`compute_cell_geometry`] derives the content and label areas shared by every cell.
//! 3. **Compose**: [`CellComposer`] renders each source through a [`RenderAdapter`] into a
//!    private cell buffer (label, preview, border).
//! 4. **Assemble**: [`SheetAssembler`] blits cells into the [`Canvas`] in discovery order and
//!    counts successes and failures.
//!
//! A source that fails to render never aborts the run: its cell is left empty but keeps its
//! border and label, and the failure is counted in [`ContactSheet::failure_count`].
#![forbid(unsafe_code)]

mod assemble;
mod compose;
mod config;
mod foundation;
mod layout;
mod render;
mod source;

pub use assemble::{AssembleOptions, ContactSheet, SheetAssembler, assemble};
pub use compose::canvas::{Canvas, MAX_CANVAS_DIM};
pub use compose::cell::{CellComposer, ComposedCell, ItemOutcome, ItemResult};
pub use compose::label::label_text;
pub use config::{LabelMode, SheetConfig};
pub use foundation::core::{PixelRect, Rgba8};
pub use foundation::error::{SheetError, SheetResult};
pub use layout::grid::{CellGeometry, GridShape, compute_cell_geometry, compute_grid_shape};
pub use render::adapter::{RasterImage, RenderAdapter, RenderError};
pub use render::fonts::build_fontdb;
pub use render::svg::{MAX_RASTER_DIM, SvgRenderer, rasterize_fit};
pub use render::timeout::TimeoutRenderer;
pub use source::{SourceItem, discover_sources};

/// Raster types used by [`RenderAdapter`] implementations.
pub use resvg::tiny_skia;

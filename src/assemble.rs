use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    compose::canvas::Canvas,
    compose::cell::{CellComposer, ComposedCell, ItemOutcome, ItemResult},
    config::SheetConfig,
    foundation::error::{SheetError, SheetResult},
    layout::grid::{CellGeometry, GridShape, compute_grid_shape},
    render::adapter::RenderAdapter,
    render::fonts::build_fontdb,
    source::SourceItem,
};

/// Threading and chunking controls for [`SheetAssembler::assemble_with`].
#[derive(Clone, Debug)]
pub struct AssembleOptions {
    /// Render cells on a worker pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count (parallel mode only).
    pub threads: Option<usize>,
    /// Cells rendered per parallel batch; bounds the number of live cell buffers.
    pub chunk_size: usize,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

/// Finished contact sheet.
#[derive(Debug)]
pub struct ContactSheet {
    pub canvas: Canvas,
    pub shape: GridShape,
    pub geometry: CellGeometry,
    pub success_count: usize,
    pub failure_count: usize,
    /// One entry per input item, in input order.
    pub items: Vec<ItemResult>,
}

impl ContactSheet {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Straight-alpha RGBA8 image of the canvas, ready for encoding.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        self.canvas.to_rgba_image()
    }
}

/// Owns the run configuration and the font database used for labels.
#[derive(Clone)]
pub struct SheetAssembler {
    config: SheetConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SheetAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetAssembler")
            .field("config", &self.config)
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl SheetAssembler {
    /// Validate `config` and load fonts (system fonts plus `config.font_dirs`).
    pub fn new(config: SheetConfig) -> SheetResult<Self> {
        config.validate()?;
        let fontdb = build_fontdb(&config.font_dirs);
        Ok(Self { config, fontdb })
    }

    /// Validate `config` and reuse an existing font database.
    pub fn with_fontdb(
        config: SheetConfig,
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> SheetResult<Self> {
        config.validate()?;
        Ok(Self { config, fontdb })
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn fontdb(&self) -> &Arc<usvg::fontdb::Database> {
        &self.fontdb
    }

    /// Sequential assembly with default options.
    pub fn assemble<R: RenderAdapter + ?Sized>(
        &self,
        items: &[SourceItem],
        adapter: &R,
    ) -> SheetResult<ContactSheet> {
        self.assemble_with(items, adapter, &AssembleOptions::default())
    }

    /// Lay out `items` in discovery order and compose one cell per item.
    ///
    /// Per-item render failures are counted, never returned. Cells are blitted and counted in
    /// index order on the calling thread, so the output does not depend on `opts`.
    #[tracing::instrument(
        skip_all,
        fields(items = items.len(), mode = ?self.config.label_mode, parallel = opts.parallel)
    )]
    pub fn assemble_with<R: RenderAdapter + ?Sized>(
        &self,
        items: &[SourceItem],
        adapter: &R,
        opts: &AssembleOptions,
    ) -> SheetResult<ContactSheet> {
        let shape = compute_grid_shape(items.len())?;
        let composer = CellComposer::new(&self.config, shape, self.fontdb.clone())?;
        let mut canvas = Canvas::new(
            shape,
            self.config.cell_width,
            self.config.cell_height,
            self.config.background,
        )?;
        tracing::info!(
            columns = shape.columns,
            rows = shape.rows,
            width = canvas.width(),
            height = canvas.height(),
            "{} files will be shown in a {}x{} grid",
            items.len(),
            shape.columns,
            shape.rows
        );

        let mut tally = Tally::new(items.len());

        if !opts.parallel {
            for (index, item) in items.iter().enumerate() {
                let cell = composer.compose(item, index, adapter)?;
                tally.accept(&mut canvas, item, cell)?;
            }
        } else {
            let pool = build_thread_pool(opts.threads)?;
            let chunk_size = normalized_chunk_size(opts.chunk_size);
            for (chunk_idx, chunk) in items.chunks(chunk_size).enumerate() {
                let base = chunk_idx * chunk_size;
                let cells: Vec<SheetResult<ComposedCell>> = pool.install(|| {
                    chunk
                        .par_iter()
                        .enumerate()
                        .map(|(j, item)| composer.compose(item, base + j, adapter))
                        .collect()
                });
                for (item, cell) in chunk.iter().zip(cells) {
                    tally.accept(&mut canvas, item, cell?)?;
                }
            }
        }

        tracing::info!(
            processed = tally.success_count,
            skipped = tally.failure_count,
            "{} files processed successfully, {} files skipped",
            tally.success_count,
            tally.failure_count
        );

        Ok(ContactSheet {
            canvas,
            shape,
            geometry: *composer.geometry(),
            success_count: tally.success_count,
            failure_count: tally.failure_count,
            items: tally.results,
        })
    }
}

/// Convenience: validate `config`, load fonts and assemble sequentially.
pub fn assemble<R: RenderAdapter + ?Sized>(
    items: &[SourceItem],
    config: &SheetConfig,
    adapter: &R,
) -> SheetResult<ContactSheet> {
    if items.is_empty() {
        return Err(SheetError::EmptyInput);
    }
    SheetAssembler::new(config.clone())?.assemble(items, adapter)
}

// Single accumulation point for blits and counters.
struct Tally {
    total: usize,
    success_count: usize,
    failure_count: usize,
    results: Vec<ItemResult>,
}

impl Tally {
    fn new(total: usize) -> Self {
        Self {
            total,
            success_count: 0,
            failure_count: 0,
            results: Vec::with_capacity(total),
        }
    }

    fn accept(
        &mut self,
        canvas: &mut Canvas,
        item: &SourceItem,
        cell: ComposedCell,
    ) -> SheetResult<()> {
        canvas.blit_cell(cell.result.index, &cell.pixels)?;
        match &cell.result.outcome {
            ItemOutcome::Rendered => {
                self.success_count += 1;
                tracing::debug!(
                    index = cell.result.index,
                    source = %item.path.display(),
                    "processed ({}/{})",
                    self.success_count,
                    self.total
                );
            }
            ItemOutcome::Failed { reason } => {
                self.failure_count += 1;
                tracing::warn!(
                    source = %item.path.display(),
                    %reason,
                    "image {} skipped",
                    cell.result.index + 1
                );
            }
        }
        self.results.push(cell.result);
        Ok(())
    }
}

fn build_thread_pool(threads: Option<usize>) -> SheetResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SheetError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("svgsheet-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SheetError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../tests/unit/assemble.rs"]
mod tests;

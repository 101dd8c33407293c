use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "svgsheet", version, about = "Render every SVG under a directory into one grid image")]
struct Cli {
    /// Directory to scan recursively for `.svg` files.
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Output PNG path.
    #[arg(long, default_value = "svg_grid_output.png")]
    out: PathBuf,

    /// Label drawn above each preview.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// JSON configuration file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Square cell edge in pixels.
    #[arg(long)]
    cell_size: Option<u32>,

    /// Inner cell padding in pixels.
    #[arg(long)]
    padding: Option<u32>,

    /// Label font size in pixels.
    #[arg(long)]
    font_size: Option<u32>,

    /// Disable smoothing of labels and previews.
    #[arg(long, default_value_t = false)]
    no_antialias: bool,

    /// Render cells in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Give up on a single file after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    None,
    Numerate,
    FileName,
}

impl From<ModeChoice> for svgsheet::LabelMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::None => svgsheet::LabelMode::None,
            ModeChoice::Numerate => svgsheet::LabelMode::Numerate,
            ModeChoice::FileName => svgsheet::LabelMode::FileName,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    eprintln!("searching for .svg files in {}", cli.root.display());
    let items = svgsheet::discover_sources(&cli.root, "svg")?;
    if items.is_empty() {
        anyhow::bail!("no SVG files found under '{}'", cli.root.display());
    }

    let assembler = svgsheet::SheetAssembler::new(config)?;
    let renderer = svgsheet::SvgRenderer::with_fontdb(assembler.fontdb().clone(), assembler.config());
    let opts = svgsheet::AssembleOptions {
        parallel: cli.parallel,
        threads: cli.threads,
        ..Default::default()
    };

    let sheet = match assembler.config().render_timeout() {
        Some(timeout) => {
            let guarded = svgsheet::TimeoutRenderer::from_shared(Arc::new(renderer), timeout);
            assembler.assemble_with(&items, &guarded, &opts)?
        }
        None => assembler.assemble_with(&items, &renderer, &opts)?,
    };

    write_png(&sheet, &cli.out)?;

    eprintln!("wrote {}", cli.out.display());
    eprintln!(
        "{} files processed successfully, {} files skipped",
        sheet.success_count, sheet.failure_count
    );
    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<svgsheet::SheetConfig> {
    let mut cfg = match &cli.config {
        Some(path) => svgsheet::SheetConfig::from_json_path(path)?,
        None => svgsheet::SheetConfig::default(),
    };
    if let Some(mode) = cli.mode {
        cfg.label_mode = mode.into();
    }
    if let Some(size) = cli.cell_size {
        cfg.cell_width = size;
        cfg.cell_height = size;
    }
    if let Some(padding) = cli.padding {
        cfg.padding = padding;
    }
    if let Some(font_size) = cli.font_size {
        cfg.font_size = font_size;
    }
    if cli.no_antialias {
        cfg.antialias = false;
    }
    if let Some(ms) = cli.timeout_ms {
        cfg.render_timeout_ms = Some(ms);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn write_png(sheet: &svgsheet::ContactSheet, out: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    sheet
        .to_rgba_image()
        .save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

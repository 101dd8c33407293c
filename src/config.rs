use std::{fs::File, io::BufReader, path::Path, path::PathBuf, time::Duration};

use anyhow::Context as _;

use crate::{
    foundation::core::Rgba8,
    foundation::error::{SheetError, SheetResult},
    layout::grid::CellGeometry,
};

/// What, if anything, is written above each preview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// No label; the label band is given back to the preview.
    None,
    /// 1-based position in discovery order.
    #[default]
    Numerate,
    /// The source's display name (its file name by default).
    FileName,
}

impl LabelMode {
    /// Whether cells reserve a label band above the content area.
    pub fn draws_label(self) -> bool {
        match self {
            LabelMode::None => false,
            LabelMode::Numerate | LabelMode::FileName => true,
        }
    }
}

/// Immutable run configuration shared by the layout engine and the cell composer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Labeling mode for every cell.
    pub label_mode: LabelMode,
    /// Cell width in pixels.
    pub cell_width: u32,
    /// Cell height in pixels.
    pub cell_height: u32,
    /// Inner margin between the cell border and its content.
    pub padding: u32,
    /// Gap between the label baseline and the top of the content area.
    pub label_gap: u32,
    /// Label font family, resolved through the font database with sans-serif fallback.
    pub font_family: String,
    /// Label font size in pixels. Also used as the label band height.
    pub font_size: u32,
    /// Label font weight (CSS scale, 400 = regular, 700 = bold).
    pub font_weight: u16,
    /// Label text color.
    pub label_color: Rgba8,
    /// Border color drawn around every cell.
    pub border_color: Rgba8,
    /// Canvas background color. Forced opaque when the canvas is filled.
    pub background: Rgba8,
    /// Smooth label glyphs and vector previews.
    pub antialias: bool,
    /// Per-item render timeout in milliseconds.
    pub render_timeout_ms: Option<u64>,
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` fonts.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            label_mode: LabelMode::Numerate,
            cell_width: 250,
            cell_height: 250,
            padding: 10,
            label_gap: 5,
            font_family: "Arial".to_string(),
            font_size: 20,
            font_weight: 700,
            label_color: Rgba8::BLACK,
            border_color: Rgba8::opaque(211, 211, 211),
            background: Rgba8::WHITE,
            antialias: true,
            render_timeout_ms: None,
            font_dirs: Vec::new(),
        }
    }
}

impl SheetConfig {
    /// Load a configuration from a JSON file. Missing fields take their default values.
    pub fn from_json_path(path: &Path) -> SheetResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that cannot produce a positive content area.
    pub fn validate(&self) -> SheetResult<()> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(SheetError::config("cell size must be > 0"));
        }
        if self.font_size == 0 {
            return Err(SheetError::config("font_size must be > 0"));
        }
        if !(1..=1000).contains(&self.font_weight) {
            return Err(SheetError::config("font_weight must be in 1..=1000"));
        }
        if self.font_family.trim().is_empty() {
            return Err(SheetError::config("font_family must be non-empty"));
        }
        if self.render_timeout_ms == Some(0) {
            return Err(SheetError::config("render_timeout_ms must be > 0 when set"));
        }
        CellGeometry::from_config(self).map(|_| ())
    }

    pub fn render_timeout(&self) -> Option<Duration> {
        self.render_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Font database shared by SVG previews and cell labels.
///
/// Loads system fonts first, then every font file found directly inside `extra_dirs`.
pub fn build_fontdb(extra_dirs: &[PathBuf]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    for dir in extra_dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(font = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// `usvg` options for one parse.
///
/// `antialias == false` switches the defaults to crisp shapes and speed-optimized text, which
/// resvg renders without smoothing. Documents that set these properties themselves still win.
pub(crate) fn svg_options(
    fontdb: Arc<usvg::fontdb::Database>,
    default_family: &str,
    antialias: bool,
    resources_dir: Option<PathBuf>,
) -> usvg::Options<'static> {
    let (shape_rendering, text_rendering) = if antialias {
        (
            usvg::ShapeRendering::GeometricPrecision,
            usvg::TextRendering::OptimizeLegibility,
        )
    } else {
        (
            usvg::ShapeRendering::CrispEdges,
            usvg::TextRendering::OptimizeSpeed,
        )
    };

    usvg::Options {
        resources_dir,
        font_family: default_family.to_string(),
        shape_rendering,
        text_rendering,
        fontdb,
        font_resolver: make_font_resolver(),
        ..Default::default()
    }
}

// Requested families first, then generic fallbacks, then any face at all, so labels still render
// on machines without the configured font.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Serif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

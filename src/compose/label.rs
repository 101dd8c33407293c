use std::sync::Arc;

use resvg::tiny_skia;

use crate::{
    config::{LabelMode, SheetConfig},
    foundation::core::Rgba8,
    render::adapter::RenderError,
    render::fonts::svg_options,
    source::SourceItem,
};

/// Text written above the item at `index`, or `None` when the mode draws no label.
pub fn label_text(mode: LabelMode, index: usize, item: &SourceItem) -> Option<String> {
    match mode {
        LabelMode::None => None,
        LabelMode::Numerate => Some((index + 1).to_string()),
        LabelMode::FileName => Some(item.display_name.clone()),
    }
}

/// Draws single-line labels with the configured font through a one-element SVG document.
#[derive(Clone)]
pub(crate) struct LabelPainter {
    fontdb: Arc<usvg::fontdb::Database>,
    family: String,
    size: u32,
    weight: u16,
    color: Rgba8,
    antialias: bool,
}

impl LabelPainter {
    pub(crate) fn new(cfg: &SheetConfig, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            fontdb,
            family: cfg.font_family.clone(),
            size: cfg.font_size,
            weight: cfg.font_weight,
            color: cfg.label_color,
            antialias: cfg.antialias,
        }
    }

    /// Draw `text` left-aligned with its baseline at (`x`, `baseline`). Overflow is clipped by
    /// the target pixmap.
    pub(crate) fn draw(
        &self,
        target: &mut tiny_skia::Pixmap,
        text: &str,
        x: u32,
        baseline: u32,
    ) -> Result<(), RenderError> {
        if text.is_empty() {
            return Ok(());
        }
        let doc = self.svg_document(target.width(), target.height(), text, x, baseline);
        let opts = svg_options(self.fontdb.clone(), &self.family, self.antialias, None);
        let tree = usvg::Tree::from_str(&doc, &opts).map_err(|e| RenderError::Parse {
            path: "<label>".to_string(),
            message: e.to_string(),
        })?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut target.as_mut());
        Ok(())
    }

    fn svg_document(&self, width: u32, height: u32, text: &str, x: u32, baseline: u32) -> String {
        let text_rendering = if self.antialias {
            "optimizeLegibility"
        } else {
            "optimizeSpeed"
        };
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#,
                r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" "#,
                r#"font-weight="{weight}" fill="{fill}" fill-opacity="{opacity}" "#,
                r#"text-rendering="{tr}" xml:space="preserve">{text}</text></svg>"#
            ),
            w = width,
            h = height,
            x = x,
            y = baseline,
            family = escape_xml(&self.family),
            size = self.size,
            weight = self.weight,
            fill = self.color.to_svg_hex(),
            opacity = self.color.alpha_f32(),
            tr = text_rendering,
            text = escape_xml(text),
        )
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compose/label.rs"]
mod tests;

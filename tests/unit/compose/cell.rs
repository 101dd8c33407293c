use super::*;

const RED: [u8; 4] = [255, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const BORDER: [u8; 4] = [211, 211, 211, 255];

struct Solid;

impl RenderAdapter for Solid {
    fn render(&self, _: &SourceItem, w: u32, h: u32) -> Result<RasterImage, RenderError> {
        let mut p = tiny_skia::Pixmap::new(w, h).ok_or(RenderError::Allocation {
            width: w,
            height: h,
        })?;
        p.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        Ok(p)
    }
}

struct Failing;

impl RenderAdapter for Failing {
    fn render(&self, src: &SourceItem, _: u32, _: u32) -> Result<RasterImage, RenderError> {
        Err(RenderError::Parse {
            path: src.path.display().to_string(),
            message: "bad".to_string(),
        })
    }
}

struct WrongSize;

impl RenderAdapter for WrongSize {
    fn render(&self, _: &SourceItem, w: u32, h: u32) -> Result<RasterImage, RenderError> {
        tiny_skia::Pixmap::new(w + 1, h).ok_or(RenderError::Allocation {
            width: w,
            height: h,
        })
    }
}

// Bottom half opaque red, top half transparent.
struct HalfTransparent;

impl RenderAdapter for HalfTransparent {
    fn render(&self, _: &SourceItem, w: u32, h: u32) -> Result<RasterImage, RenderError> {
        let mut p = tiny_skia::Pixmap::new(w, h).ok_or(RenderError::Allocation {
            width: w,
            height: h,
        })?;
        let rect = tiny_skia::Rect::from_xywh(0.0, (h / 2) as f32, w as f32, (h - h / 2) as f32)
            .ok_or(RenderError::Allocation {
                width: w,
                height: h,
            })?;
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(255, 0, 0, 255);
        p.fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
        Ok(p)
    }
}

fn small_config(mode: LabelMode) -> SheetConfig {
    SheetConfig {
        label_mode: mode,
        cell_width: 60,
        cell_height: 60,
        padding: 5,
        label_gap: 5,
        font_size: 10,
        ..SheetConfig::default()
    }
}

fn composer(mode: LabelMode, shape: GridShape) -> CellComposer {
    CellComposer::new(
        &small_config(mode),
        shape,
        Arc::new(usvg::fontdb::Database::new()),
    )
    .unwrap()
}

fn one_by_one() -> GridShape {
    GridShape {
        columns: 1,
        rows: 1,
    }
}

fn px(p: &tiny_skia::Pixmap, x: u32, y: u32) -> [u8; 4] {
    let c = p.pixel(x, y).unwrap().demultiply();
    [c.red(), c.green(), c.blue(), c.alpha()]
}

fn assert_border(p: &tiny_skia::Pixmap) {
    let (w, h) = (p.width(), p.height());
    for (x, y) in [(0, 0), (w - 1, h - 1), (0, h / 2), (w - 1, h / 2), (w / 2, 0)] {
        assert_eq!(px(p, x, y), BORDER, "border at ({x},{y})");
    }
}

#[test]
fn labeled_geometry_for_small_cells() {
    let c = composer(LabelMode::Numerate, one_by_one());
    let g = c.geometry();
    assert_eq!((g.content_width, g.content_height), (35, 35));
    assert_eq!((g.content_x, g.content_y), (12, 20));
    assert_eq!(g.content_bottom(), 55);
}

#[test]
fn rendered_cell_places_preview_in_content_area() {
    let c = composer(LabelMode::Numerate, one_by_one());
    let item = SourceItem::from_path("a.svg");
    let cell = c.compose(&item, 0, &Solid).unwrap();

    assert!(cell.result.is_success());
    assert_eq!(cell.result.label.as_deref(), Some("1"));

    let p = &cell.pixels;
    assert_eq!(px(p, 12, 20), RED);
    assert_eq!(px(p, 46, 54), RED);
    assert_eq!(px(p, 11, 30), WHITE);
    assert_eq!(px(p, 47, 30), WHITE);
    assert_eq!(px(p, 30, 56), WHITE);
    assert_border(p);
}

#[test]
fn failed_cell_keeps_border_and_label() {
    let c = composer(LabelMode::FileName, one_by_one());
    let item = SourceItem::from_path("dir/broken.svg");
    let cell = c.compose(&item, 0, &Failing).unwrap();

    assert!(!cell.result.is_success());
    assert_eq!(cell.result.label.as_deref(), Some("broken.svg"));
    match &cell.result.outcome {
        ItemOutcome::Failed { reason } => assert!(reason.contains("bad")),
        ItemOutcome::Rendered => panic!("expected failure"),
    }
    assert_eq!(px(&cell.pixels, 30, 40), WHITE);
    assert_border(&cell.pixels);
}

#[test]
fn wrong_raster_size_fails_item() {
    let c = composer(LabelMode::Numerate, one_by_one());
    let cell = c
        .compose(&SourceItem::from_path("a.svg"), 0, &WrongSize)
        .unwrap();
    match cell.result.outcome {
        ItemOutcome::Failed { reason } => assert!(reason.contains("expected 35x35")),
        ItemOutcome::Rendered => panic!("expected failure"),
    }
}

#[test]
fn unlabeled_cell_uses_full_inner_area() {
    let c = composer(LabelMode::None, one_by_one());
    let cell = c.compose(&SourceItem::from_path("a.svg"), 0, &Solid).unwrap();
    assert_eq!(cell.result.label, None);
    assert_eq!(px(&cell.pixels, 5, 5), RED);
    assert_eq!(px(&cell.pixels, 54, 54), RED);
    assert_eq!(px(&cell.pixels, 4, 30), WHITE);
    assert_border(&cell.pixels);
}

#[test]
fn transparent_preview_pixels_show_background() {
    let c = composer(LabelMode::Numerate, one_by_one());
    let cell = c
        .compose(&SourceItem::from_path("a.svg"), 0, &HalfTransparent)
        .unwrap();
    assert_eq!(px(&cell.pixels, 30, 22), WHITE);
    assert_eq!(px(&cell.pixels, 30, 50), RED);
}

#[test]
fn compose_cell_blits_into_indexed_slot() {
    let shape = GridShape {
        columns: 2,
        rows: 2,
    };
    let c = composer(LabelMode::None, shape);
    let mut canvas = Canvas::new(shape, 60, 60, Rgba8::WHITE).unwrap();

    let res = c
        .compose_cell(&mut canvas, &SourceItem::from_path("a.svg"), 3, &Solid)
        .unwrap();
    assert!(res.is_success());
    assert_eq!(res.index, 3);

    assert_eq!(canvas.pixel(90, 90), Some(RED));
    assert_eq!(canvas.pixel(60, 60), Some(BORDER));
    assert_eq!(canvas.pixel(30, 30), Some(WHITE));
    assert_eq!(canvas.pixel(0, 0), Some(WHITE));
}

struct Panics;

impl RenderAdapter for Panics {
    fn render(&self, _: &SourceItem, _: u32, _: u32) -> Result<RasterImage, RenderError> {
        panic!("malformed document");
    }
}

#[test]
fn renderer_panic_becomes_item_failure() {
    let c = composer(LabelMode::Numerate, one_by_one());
    let cell = c
        .compose(&SourceItem::from_path("bad.svg"), 0, &Panics)
        .unwrap();
    assert_eq!(
        cell.result.outcome,
        ItemOutcome::Failed {
            reason: RenderError::Panicked.to_string()
        }
    );
    assert_eq!(px(&cell.pixels, 30, 40), WHITE);
    assert_border(&cell.pixels);
}

use super::*;

fn painter() -> LabelPainter {
    LabelPainter::new(
        &SheetConfig::default(),
        Arc::new(usvg::fontdb::Database::new()),
    )
}

#[test]
fn numerate_labels_are_one_based() {
    let item = SourceItem::from_path("x/y.svg");
    assert_eq!(
        label_text(LabelMode::Numerate, 0, &item).as_deref(),
        Some("1")
    );
    assert_eq!(
        label_text(LabelMode::Numerate, 41, &item).as_deref(),
        Some("42")
    );
}

#[test]
fn file_name_labels_are_verbatim() {
    let item = SourceItem::from_path("icons/A very long & <odd> name.svg");
    assert_eq!(
        label_text(LabelMode::FileName, 3, &item).as_deref(),
        Some("A very long & <odd> name.svg")
    );
}

#[test]
fn none_mode_has_no_label() {
    let item = SourceItem::from_path("a.svg");
    assert_eq!(label_text(LabelMode::None, 0, &item), None);
}

#[test]
fn document_escapes_markup() {
    let doc = painter().svg_document(100, 40, "a<b>&\"c\"", 10, 30);
    assert!(doc.contains("a&lt;b&gt;&amp;&quot;c&quot;"));
    assert!(doc.contains(r#"x="10" y="30""#));
    assert!(doc.contains(r#"font-weight="700""#));
    assert!(doc.contains(r##"fill="#000000""##));
}

#[test]
fn document_reflects_antialias_flag() {
    let cfg = SheetConfig {
        antialias: false,
        ..SheetConfig::default()
    };
    let p = LabelPainter::new(&cfg, Arc::new(usvg::fontdb::Database::new()));
    assert!(p.svg_document(10, 10, "1", 0, 5).contains("optimizeSpeed"));
    assert!(
        painter()
            .svg_document(10, 10, "1", 0, 5)
            .contains("optimizeLegibility")
    );
}

#[test]
fn draw_tolerates_missing_fonts() {
    let mut target = tiny_skia::Pixmap::new(50, 30).unwrap();
    target.fill(tiny_skia::Color::WHITE);
    painter().draw(&mut target, "12", 2, 20).unwrap();
    painter().draw(&mut target, "", 2, 20).unwrap();
    assert_eq!((target.width(), target.height()), (50, 30));
}

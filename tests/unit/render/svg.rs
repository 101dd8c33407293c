use super::*;

fn renderer() -> SvgRenderer {
    // An empty database keeps these tests independent of installed fonts.
    SvgRenderer::with_fontdb(
        Arc::new(usvg::fontdb::Database::new()),
        &SheetConfig::default(),
    )
}

fn alpha_at(p: &RasterImage, x: u32, y: u32) -> u8 {
    p.pixel(x, y).unwrap().alpha()
}

#[test]
fn square_svg_fills_target() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect width="10" height="10" fill="#ff0000"/></svg>"##;
    let tree = renderer().parse(svg, std::path::Path::new("mem.svg")).unwrap();
    let p = rasterize_fit(&tree, 40, 40).unwrap();
    assert_eq!((p.width(), p.height()), (40, 40));
    let c = p.pixel(20, 20).unwrap();
    assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (255, 0, 0, 255));
}

#[test]
fn wide_svg_is_bottom_aligned_and_centered() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect width="20" height="10" fill="#0000ff"/></svg>"##;
    let tree = renderer().parse(svg, std::path::Path::new("mem.svg")).unwrap();
    let p = rasterize_fit(&tree, 40, 40).unwrap();
    // Drawing is 40x20 and occupies the bottom half.
    assert_eq!(alpha_at(&p, 20, 5), 0);
    assert_eq!(alpha_at(&p, 20, 35), 255);
    assert_eq!(alpha_at(&p, 1, 39), 255);
}

#[test]
fn tall_svg_is_horizontally_centered() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20">
        <rect width="10" height="20" fill="#00ff00"/></svg>"##;
    let tree = renderer().parse(svg, std::path::Path::new("mem.svg")).unwrap();
    let p = rasterize_fit(&tree, 40, 40).unwrap();
    // Drawing is 20x40, spanning x in [10, 30).
    assert_eq!(alpha_at(&p, 2, 20), 0);
    assert_eq!(alpha_at(&p, 20, 20), 255);
    assert_eq!(alpha_at(&p, 37, 20), 0);
}

#[test]
fn invalid_sizes_are_rejected() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    let tree = renderer().parse(svg, std::path::Path::new("mem.svg")).unwrap();
    assert!(matches!(
        rasterize_fit(&tree, 0, 10),
        Err(RenderError::InvalidSize { .. })
    ));
    assert!(matches!(
        rasterize_fit(&tree, MAX_RASTER_DIM + 1, 10),
        Err(RenderError::InvalidSize { .. })
    ));
}

#[test]
fn malformed_svg_is_parse_error() {
    let err = renderer()
        .parse(b"<svg", std::path::Path::new("broken.svg"))
        .unwrap_err();
    match err {
        RenderError::Parse { path, .. } => assert_eq!(path, "broken.svg"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_read_error() {
    let item = SourceItem::from_path("target/svg_unit/definitely-missing.svg");
    let err = renderer().render(&item, 10, 10).unwrap_err();
    assert!(matches!(err, RenderError::Read { .. }));
}

#[test]
fn render_reads_file_at_requested_size() {
    let dir = std::path::PathBuf::from("target").join("svg_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("dot.svg");
    std::fs::write(
        &path,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 4 4"><circle cx="2" cy="2" r="2"/></svg>"#,
    )
    .unwrap();

    let p = renderer()
        .render(&SourceItem::from_path(&path), 33, 17)
        .unwrap();
    assert_eq!((p.width(), p.height()), (33, 17));
}

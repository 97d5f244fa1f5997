use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use pretty_assertions::assert_eq;

use gridtable::core::geometry::PixelRect;
use gridtable::core::warning::WarningCode;
use gridtable::export::{Exporter, HtmlTableExporter, JsonExporter};
use gridtable::grid::assemble_table;
use gridtable::parser::PdfReader;
use gridtable::pipeline::{build_document, PipelineConfig};
use gridtable::{DocumentFinal, GridParams, TableDetector, TableFinal};

/// White page with 1px black rulings; `ruled(x, y)` decides each pixel.
fn page<F: Fn(u32, u32) -> bool>(width: u32, height: u32, ruled: F) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
        Luma([if ruled(x, y) { 0 } else { 255 }])
    }))
}

fn detector() -> TableDetector {
    TableDetector::new(GridParams::default()).expect("default params are valid")
}

fn table_for(image: &DynamicImage) -> TableFinal {
    let analysis = detector().analyze(image).expect("image is valid");
    assemble_table(&analysis, 0, |region| Ok(format!("{}x{}", region.x, region.y)))
}

fn cell_shapes(table: &TableFinal) -> Vec<(usize, usize, usize, usize, PixelRect)> {
    table
        .cells
        .iter()
        .map(|c| (c.row, c.col, c.col_span, c.row_span, c.bbox))
        .collect()
}

/// Every band of the logical grid is covered by exactly one emitted cell.
fn assert_tiles_grid(table: &TableFinal) {
    let mut covered = vec![vec![0u32; table.grid.cols]; table.grid.rows];
    for cell in &table.cells {
        assert!(cell.col_span >= 1 && cell.row_span >= 1);
        for row in cell.row..cell.row + cell.row_span {
            for col in cell.col..cell.col + cell.col_span {
                covered[row][col] += 1;
            }
        }
    }
    assert!(
        covered.iter().flatten().all(|&n| n == 1),
        "grid coverage: {covered:?}"
    );
    let grid_area: u64 = if table.row_lines.len() < 2 || table.col_lines.len() < 2 {
        u64::from(table.width) * u64::from(table.height)
    } else {
        let h = table.row_lines[table.row_lines.len() - 1] - table.row_lines[0];
        let w = table.col_lines[table.col_lines.len() - 1] - table.col_lines[0];
        u64::from(w) * u64::from(h)
    };
    let cell_area: u64 = table.cells.iter().map(|c| c.bbox.area()).sum();
    assert_eq!(cell_area, grid_area);
}

fn temp_output_dir(prefix: &str) -> PathBuf {
    let mut out = std::env::temp_dir();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    out.push(format!("{prefix}-{}-{now}", std::process::id()));
    out
}

#[test]
fn single_band_table_becomes_one_cell() {
    let image = page(200, 120, |x, y| y == 10 || y == 30 || x == 10 || x == 40);
    let table = table_for(&image);

    assert_eq!(table.row_lines, vec![10, 30]);
    assert_eq!(table.col_lines, vec![10, 40]);
    assert_eq!(
        cell_shapes(&table),
        vec![(0, 0, 1, 1, PixelRect::new(10, 10, 30, 20))]
    );
    assert_eq!(table.cells[0].text, "10x10");
    assert!(table.warnings.is_empty());
}

#[test]
fn fully_ruled_grid_has_one_cell_per_band() {
    let image = page(300, 200, |x, y| {
        matches!(y, 20 | 100 | 180) || matches!(x, 20 | 150 | 280)
    });
    let table = table_for(&image);

    assert_eq!(table.row_lines, vec![20, 100, 180]);
    assert_eq!(table.col_lines, vec![20, 150, 280]);
    assert_eq!(table.cells.len(), 4);
    assert!(table.cells.iter().all(|c| !c.is_merged()));
    assert_tiles_grid(&table);
}

#[test]
fn interrupted_vertical_ruling_yields_colspan() {
    // x = 150 is only ruled below y = 100.
    let image = page(300, 200, |x, y| {
        matches!(y, 20 | 100 | 180) || matches!(x, 20 | 280) || (x == 150 && y >= 100)
    });
    let table = table_for(&image);

    assert_eq!(table.col_lines, vec![20, 150, 280]);
    assert_eq!(
        cell_shapes(&table),
        vec![
            (0, 0, 2, 1, PixelRect::new(20, 20, 260, 80)),
            (1, 0, 1, 1, PixelRect::new(20, 100, 130, 80)),
            (1, 1, 1, 1, PixelRect::new(150, 100, 130, 80)),
        ]
    );
    assert_tiles_grid(&table);
}

#[test]
fn interrupted_horizontal_ruling_yields_rowspan() {
    // y = 100 is only ruled right of x = 150.
    let image = page(300, 200, |x, y| {
        matches!(y, 20 | 180) || (y == 100 && x >= 150) || matches!(x, 20 | 150 | 280)
    });
    let table = table_for(&image);

    assert_eq!(table.row_lines, vec![20, 100, 180]);
    assert_eq!(
        cell_shapes(&table),
        vec![
            (0, 0, 1, 2, PixelRect::new(20, 20, 130, 160)),
            (0, 1, 1, 1, PixelRect::new(150, 20, 130, 80)),
            (1, 1, 1, 1, PixelRect::new(150, 100, 130, 80)),
        ]
    );
    assert_tiles_grid(&table);

    let html = HtmlTableExporter::render(&table);
    assert!(html.contains("<td colspan='1' rowspan='2'>20x20</td>"));
}

#[test]
fn blank_page_is_a_single_cell() {
    let image = page(100, 100, |_, _| false);
    let table = table_for(&image);

    assert!(table.row_lines.is_empty());
    assert!(table.col_lines.is_empty());
    assert_eq!(
        cell_shapes(&table),
        vec![(0, 0, 1, 1, PixelRect::new(0, 0, 100, 100))]
    );
    assert_eq!(table.warnings[0].code, WarningCode::DegenerateGrid);
    assert_tiles_grid(&table);
}

#[test]
fn glyph_noise_inside_cells_does_not_add_lines() {
    let image = page(300, 200, |x, y| {
        let ruled = matches!(y, 20 | 100 | 180) || matches!(x, 20 | 150 | 280);
        // Short glyph-like strokes inside the top-left cell.
        let glyphs = (40..120).contains(&x) && (50..60).contains(&y) && x % 6 < 3;
        ruled || glyphs
    });
    let table = table_for(&image);

    assert_eq!(table.row_lines, vec![20, 100, 180]);
    assert_eq!(table.col_lines, vec![20, 150, 280]);
    assert_eq!(table.cells.len(), 4);
}

#[test]
fn color_input_matches_grayscale_input() {
    let ruled = |x: u32, y: u32| matches!(y, 20 | 100 | 180) || matches!(x, 20 | 150 | 280);
    let rgb = RgbImage::from_fn(300, 200, |x, y| {
        if ruled(x, y) {
            Rgb([20, 20, 90])
        } else {
            Rgb([250, 250, 240])
        }
    });
    let from_color = table_for(&DynamicImage::ImageRgb8(rgb));
    let from_gray = table_for(&page(300, 200, ruled));

    assert_eq!(cell_shapes(&from_color), cell_shapes(&from_gray));
}

#[test]
fn analysis_is_deterministic() {
    let image = page(300, 200, |x, y| {
        matches!(y, 20 | 100 | 180) || matches!(x, 20 | 280) || (x == 150 && y >= 100)
    });
    let first = detector().analyze(&image).expect("valid image");
    let second = detector().analyze(&image).expect("valid image");

    assert_eq!(first.lines, second.lines);
    assert_eq!(first.spans, second.spans);
    assert!(first
        .lines
        .row_starts()
        .windows(2)
        .all(|pair| pair[0] < pair[1]));
}

#[test]
fn zero_area_image_is_rejected() {
    let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
    let err = detector().analyze(&empty).expect_err("zero area should fail");
    assert!(err.to_string().contains("zero area"));
}

#[test]
fn image_file_runs_through_pipeline() -> Result<()> {
    let out = temp_output_dir("gridtable-image");
    fs::create_dir_all(&out)?;
    let input = out.join("scan.png");
    page(300, 200, |x, y| {
        matches!(y, 20 | 100 | 180) || matches!(x, 20 | 150 | 280)
    })
    .save(&input)?;

    let config = PipelineConfig::new(input, out.join("result"), 150);
    let document = build_document(&config)?;
    assert_eq!(document.pages.len(), 1);
    assert_eq!(document.pages[0].cells.len(), 4);
    assert!(document.pages[0].cells.iter().all(|c| c.text.is_empty()));

    JsonExporter::new(out.clone()).export(&document)?;
    let json = fs::read_to_string(out.join("document.json"))?;
    let parsed: DocumentFinal = serde_json::from_str(&json)?;
    assert_eq!(parsed.pages[0].cells, document.pages[0].cells);

    let _ = fs::remove_dir_all(&out);
    Ok(())
}

/// Integration test: ruled table PDF through pdftoppm and pdftotext
#[test]
fn pdf_pipeline_with_fixture() -> Result<()> {
    let test_pdf = Path::new("tests/fixtures/ruled_table.pdf");

    // Skip if the fixture or poppler is missing (CI environment)
    if !test_pdf.exists() {
        eprintln!("Skipping test: tests/fixtures/ruled_table.pdf not found");
        return Ok(());
    }
    let reader = PdfReader::new(test_pdf.to_path_buf())?;
    let Ok(page_count) = reader.page_count() else {
        eprintln!("Skipping test: pdfinfo not available");
        return Ok(());
    };
    assert!(page_count > 0);

    let out = temp_output_dir("gridtable-pdf");
    let config = PipelineConfig::new(test_pdf.to_path_buf(), out.clone(), 150);
    let document = build_document(&config)?;
    assert_eq!(document.pages.len(), page_count);
    let table = &document.pages[0];
    assert_tiles_grid(table);

    // 300x200pt page ruled into a 2x2 grid, one word per cell.
    assert_eq!((table.grid.rows, table.grid.cols), (2, 2));
    let texts: Vec<&str> = table.cells.iter().map(|c| c.text.trim()).collect();
    assert_eq!(texts, vec!["North", "South", "East", "West"]);
    assert!(table.raster.as_ref().is_some_and(|path| path.exists()));

    let _ = fs::remove_dir_all(&out);
    Ok(())
}

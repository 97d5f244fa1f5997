use anyhow::Result;
use tracing::{debug, warn};

use crate::core::geometry::PixelRect;
use crate::core::model::{CellDescriptor, GridDimensions, TableFinal};
use crate::core::warning::{TableWarning, WarningCode};
use crate::grid::lines::GridLines;
use crate::grid::spans::SpanMap;
use crate::grid::GridAnalysis;

/// A cell's extent on the band grid, before any text is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlan {
    pub row: usize,
    pub col: usize,
    pub col_span: usize,
    pub row_span: usize,
    pub bbox: PixelRect,
}

/// Resolve every band into exactly one cell.
///
/// Bands are visited row-major. A band already covered by an earlier cell is
/// skipped; otherwise it anchors a new cell that grows right while the span map
/// allows it and the next band is still free, then grows down along the
/// anchor column. A degenerate grid becomes one cell covering the page.
pub fn plan_cells(lines: &GridLines, spans: &SpanMap, width: u32, height: u32) -> Vec<CellPlan> {
    if lines.is_degenerate() {
        return vec![CellPlan {
            row: 0,
            col: 0,
            col_span: 1,
            row_span: 1,
            bbox: PixelRect::new(0, 0, width, height),
        }];
    }

    let row_starts = lines.row_starts();
    let col_starts = lines.col_starts();
    let (rows, cols) = (lines.row_bands(), lines.col_bands());
    let mut absorbed = vec![vec![false; cols]; rows];
    let mut plans = Vec::new();

    for i in 0..rows {
        for j in 0..cols {
            if absorbed[i][j] {
                continue;
            }

            let mut col_end = j;
            while col_end + 1 < cols && spans.col_continues(i, col_end) && !absorbed[i][col_end + 1]
            {
                col_end += 1;
            }

            let mut row_end = i;
            while row_end + 1 < rows && spans.row_continues(j, row_end) {
                row_end += 1;
            }

            for band_row in &mut absorbed[i..=row_end] {
                for band in &mut band_row[j..=col_end] {
                    *band = true;
                }
            }

            plans.push(CellPlan {
                row: i,
                col: j,
                col_span: col_end - j + 1,
                row_span: row_end - i + 1,
                bbox: PixelRect::from_corners(
                    col_starts[j],
                    row_starts[i],
                    col_starts[col_end + 1],
                    row_starts[row_end + 1],
                ),
            });
        }
    }

    plans
}

/// Attach text to every planned cell and build the page's table.
///
/// A failing `text_for` call leaves that cell empty and records a warning; the
/// rest of the table is still assembled.
pub fn assemble_table<F>(analysis: &GridAnalysis, page_idx: usize, mut text_for: F) -> TableFinal
where
    F: FnMut(PixelRect) -> Result<String>,
{
    let lines = &analysis.lines;
    let mut warnings = Vec::new();

    let grid = if lines.is_degenerate() {
        warn!(
            page = page_idx + 1,
            row_lines = lines.row_starts().len(),
            col_lines = lines.col_starts().len(),
            "no interior grid found; emitting the page as one cell"
        );
        warnings.push(TableWarning::new(
            WarningCode::DegenerateGrid,
            format!(
                "found {} row and {} column separator lines; page treated as a single cell",
                lines.row_starts().len(),
                lines.col_starts().len()
            ),
        ));
        GridDimensions { rows: 1, cols: 1 }
    } else {
        GridDimensions {
            rows: lines.row_bands(),
            cols: lines.col_bands(),
        }
    };

    let plans = analysis.plan();
    let mut cells = Vec::with_capacity(plans.len());
    for plan in plans {
        let text = match text_for(plan.bbox) {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    page = page_idx + 1,
                    row = plan.row,
                    col = plan.col,
                    error = %err,
                    "text extraction failed for cell"
                );
                warnings.push(
                    TableWarning::new(
                        WarningCode::TextExtractionFailed,
                        format!("text extraction failed: {err:#}"),
                    )
                    .with_cell(plan.row, plan.col),
                );
                String::new()
            }
        };
        cells.push(CellDescriptor {
            row: plan.row,
            col: plan.col,
            bbox: plan.bbox,
            col_span: plan.col_span,
            row_span: plan.row_span,
            text,
        });
    }

    debug!(
        page = page_idx + 1,
        cells = cells.len(),
        rows = grid.rows,
        cols = grid.cols,
        "table assembled"
    );

    TableFinal {
        page_idx,
        width: analysis.width,
        height: analysis.height,
        grid,
        row_lines: lines.row_starts().to_vec(),
        col_lines: lines.col_starts().to_vec(),
        cells,
        warnings,
        raster: None,
    }
}

use serde::Serialize;
use tracing::debug;

use crate::grid::lines::GridLines;
use crate::grid::mask::CombinedMask;

/// Per-band merge flags.
///
/// `col_continues[row][col]` is set when the cell in `col` merges into `col + 1`;
/// `row_continues[col][row]` when the cell in `row` merges into `row + 1`.
/// The last band on each axis never continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanMap {
    col_continues: Vec<Vec<bool>>,
    row_continues: Vec<Vec<bool>>,
}

impl SpanMap {
    pub fn empty(row_bands: usize, col_bands: usize) -> Self {
        Self {
            col_continues: vec![vec![false; col_bands]; row_bands],
            row_continues: vec![vec![false; row_bands]; col_bands],
        }
    }

    #[cfg(test)]
    pub(crate) fn from_tables(col_continues: Vec<Vec<bool>>, row_continues: Vec<Vec<bool>>) -> Self {
        Self {
            col_continues,
            row_continues,
        }
    }

    /// Sample the two-pixel strip on each interior boundary of `lines`.
    ///
    /// A boundary whose strip is entirely white in the combined mask has no
    /// ruling for that band, so the two neighbouring cells are one.
    pub fn analyze(lines: &GridLines, mask: &CombinedMask) -> Self {
        let rows = lines.row_starts();
        let cols = lines.col_starts();
        let mut spans = Self::empty(lines.row_bands(), lines.col_bands());

        for i in 0..lines.row_bands() {
            let band_rows = rows[i] + 1..rows[i + 1];
            for j in 0..lines.col_bands().saturating_sub(1) {
                let boundary = cols[j + 1];
                spans.col_continues[i][j] =
                    mask.region_is_open(boundary - 1..boundary + 1, band_rows.clone());
            }
        }

        for j in 0..lines.col_bands() {
            let band_cols = cols[j] + 1..cols[j + 1];
            for i in 0..lines.row_bands().saturating_sub(1) {
                let boundary = rows[i + 1];
                spans.row_continues[j][i] =
                    mask.region_is_open(band_cols.clone(), boundary - 1..boundary + 1);
            }
        }

        debug!(
            col_merges = count(&spans.col_continues),
            row_merges = count(&spans.row_continues),
            "span analysis"
        );
        spans
    }

    pub fn col_continues(&self, row: usize, col: usize) -> bool {
        self.col_continues
            .get(row)
            .and_then(|flags| flags.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn row_continues(&self, col: usize, row: usize) -> bool {
        self.row_continues
            .get(col)
            .and_then(|flags| flags.get(row))
            .copied()
            .unwrap_or(false)
    }
}

fn count(table: &[Vec<bool>]) -> usize {
    table.iter().flatten().filter(|&&flag| flag).count()
}

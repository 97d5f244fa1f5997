use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::geometry::PixelRect;
use crate::core::warning::TableWarning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFinal {
    pub pages: Vec<TableFinal>,
}

/// Number of logical row and column bands in a recovered table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridDimensions {
    pub rows: usize,
    pub cols: usize,
}

/// One page's table, cells in row-major then left-to-right order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFinal {
    pub page_idx: usize,
    pub width: u32,
    pub height: u32,
    pub grid: GridDimensions,
    pub row_lines: Vec<u32>,
    pub col_lines: Vec<u32>,
    pub cells: Vec<CellDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TableWarning>,
    /// Rendered page the cell boxes refer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raster: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellDescriptor {
    pub row: usize,
    pub col: usize,
    pub bbox: PixelRect,
    pub col_span: usize,
    pub row_span: usize,
    pub text: String,
}

impl CellDescriptor {
    pub fn is_merged(&self) -> bool {
        self.col_span > 1 || self.row_span > 1
    }
}

impl TableFinal {
    /// Cells anchored in the given row band.
    pub fn cells_in_row(&self, row: usize) -> impl Iterator<Item = &CellDescriptor> {
        self.cells.iter().filter(move |cell| cell.row == row)
    }
}

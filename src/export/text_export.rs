use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{CellDescriptor, DocumentFinal, TableFinal};
use crate::export::Exporter;

#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn format_cell(cell: &CellDescriptor) -> String {
        let bbox = cell.bbox;
        let header = format!(
            "[r{} c{} span {}x{} at x:{} y:{} w:{} h:{}]",
            cell.row,
            cell.col,
            cell.col_span,
            cell.row_span,
            bbox.x,
            bbox.y,
            bbox.width,
            bbox.height
        );
        let text = cell.text.trim();
        if text.is_empty() {
            header
        } else {
            format!("{header}\n{text}")
        }
    }

    pub fn render(table: &TableFinal) -> String {
        let mut out = format!(
            "=== Page {} ({} rows x {} cols) ===\n\n",
            table.page_idx + 1,
            table.grid.rows,
            table.grid.cols
        );
        for cell in &table.cells {
            out.push_str(&Self::format_cell(cell));
            out.push_str("\n\n");
        }
        out
    }
}

impl Exporter for TextExporter {
    fn export(&self, document: &DocumentFinal) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let full_text: String = document.pages.iter().map(Self::render).collect();
        fs::write(self.out_dir.join("document.txt"), full_text)?;
        Ok(())
    }
}

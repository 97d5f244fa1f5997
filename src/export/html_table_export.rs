use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{DocumentFinal, TableFinal};
use crate::export::Exporter;

/// Writes each page's table as a standalone HTML document.
#[derive(Debug, Clone)]
pub struct HtmlTableExporter {
    out_dir: PathBuf,
}

impl HtmlTableExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    /// One `<tr>` per row band, including bands fully covered by rowspans,
    /// so that `rowspan` counts line up with the grid.
    pub fn render(table: &TableFinal) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>\n<style>\ntable { border-collapse: collapse; }\ntd { border: 1px solid gray; white-space: pre-wrap; vertical-align: top; }\n</style>\n</head>\n<body>\n<table>\n",
        );
        for row in 0..table.grid.rows {
            html.push_str("<tr>\n");
            for cell in table.cells_in_row(row) {
                html.push_str(&format!(
                    "<td colspan='{}' rowspan='{}'>{}</td>\n",
                    cell.col_span,
                    cell.row_span,
                    html_escape::encode_text(cell.text.trim_end())
                ));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

impl Exporter for HtmlTableExporter {
    fn export(&self, document: &DocumentFinal) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        for table in &document.pages {
            let path = self
                .out_dir
                .join(format!("table_page_{:03}.html", table.page_idx + 1));
            fs::write(path, Self::render(table))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::PixelRect;
    use crate::core::model::{CellDescriptor, GridDimensions};

    #[test]
    fn renders_spans_and_escapes_text() {
        let cell = |row, col, col_span, row_span, text: &str| CellDescriptor {
            row,
            col,
            bbox: PixelRect::new(0, 0, 1, 1),
            col_span,
            row_span,
            text: text.to_string(),
        };
        let table = TableFinal {
            page_idx: 0,
            width: 100,
            height: 100,
            grid: GridDimensions { rows: 2, cols: 2 },
            row_lines: vec![0, 50, 99],
            col_lines: vec![0, 50, 99],
            cells: vec![cell(0, 0, 1, 2, "a<b\n"), cell(0, 1, 1, 1, "x"), cell(1, 1, 1, 1, "y")],
            warnings: Vec::new(),
            raster: None,
        };

        let html = HtmlTableExporter::render(&table);
        assert!(html.contains("<td colspan='1' rowspan='2'>a&lt;b</td>"));
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<td").count(), 3);
    }
}

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::{CellDescriptor, DocumentFinal, TableFinal};
use crate::export::Exporter;

/// Overlays detected grid lines and cell boxes on the rendered page.
#[derive(Debug, Clone)]
pub struct HtmlDebugExporter {
    out_dir: PathBuf,
}

impl HtmlDebugExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn cell_to_div(cell: &CellDescriptor) -> String {
        let bbox = cell.bbox;
        let class = if cell.is_merged() { "cell merged" } else { "cell" };
        format!(
            r#"<div class='{class}' style='left:{x}px; top:{y}px; width:{w}px; height:{h}px;' data-row='{row}' data-col='{col}' data-colspan='{col_span}' data-rowspan='{row_span}' data-text='{text}'></div>"#,
            x = bbox.x,
            y = bbox.y,
            w = bbox.width,
            h = bbox.height,
            row = cell.row,
            col = cell.col,
            col_span = cell.col_span,
            row_span = cell.row_span,
            text = html_escape::encode_single_quoted_attribute(&cell.text),
        )
    }

    fn line_divs(table: &TableFinal) -> String {
        let mut out = String::new();
        for &y in &table.row_lines {
            out.push_str(&format!(
                "<div class='line row-line' style='left:0; top:{y}px; width:{w}px; height:1px;'></div>",
                w = table.width
            ));
        }
        for &x in &table.col_lines {
            out.push_str(&format!(
                "<div class='line col-line' style='left:{x}px; top:0; width:1px; height:{h}px;'></div>",
                h = table.height
            ));
        }
        out
    }

    pub fn render(table: &TableFinal) -> String {
        let image = table
            .raster
            .as_ref()
            .map(|path| {
                std::path::absolute(path)
                    .unwrap_or_else(|_| path.clone())
                    .display()
                    .to_string()
            })
            .unwrap_or_default();
        let mut overlay = Self::line_divs(table);
        for cell in &table.cells {
            overlay.push_str(&Self::cell_to_div(cell));
        }

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset='utf-8'>
<title>gridtable debug page {page}</title>
<style>
body {{ margin: 0; font-family: Arial, sans-serif; }}
#canvas {{ position: relative; width: {width}px; height: {height}px; }}
#canvas img {{ display: block; }}
.cell {{ position: absolute; border: 2px solid rgba(0,128,0,0.6); box-sizing: border-box; }}
.cell.merged {{ border-color: rgba(255,140,0,0.8); background: rgba(255,165,0,0.12); }}
.line {{ position: absolute; background: rgba(255,0,0,0.5); }}
#info {{ position: fixed; right: 10px; top: 10px; background: #fff; padding: 10px; border: 1px solid #ddd; max-width: 300px; white-space: pre-wrap; }}
</style>
</head>
<body>
<div id='info'>{rows} rows x {cols} cols. Click a cell to inspect.</div>
<div id='canvas'>
<img src='{image}' />
{overlay}
</div>
<script>
const info = document.getElementById('info');
for (const el of document.querySelectorAll('.cell')) {{
  el.addEventListener('click', () => {{
    info.textContent = `row ${{el.dataset.row}} col ${{el.dataset.col}}\ncolspan ${{el.dataset.colspan}} rowspan ${{el.dataset.rowspan}}\n${{el.dataset.text}}`;
  }});
}}
</script>
</body>
</html>"#,
            page = table.page_idx + 1,
            width = table.width,
            height = table.height,
            rows = table.grid.rows,
            cols = table.grid.cols,
            image = html_escape::encode_single_quoted_attribute(&image),
            overlay = overlay,
        )
    }
}

impl Exporter for HtmlDebugExporter {
    fn export(&self, document: &DocumentFinal) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        for table in &document.pages {
            let path = self
                .out_dir
                .join(format!("page_{:03}.html", table.page_idx + 1));
            fs::write(path, Self::render(table))?;
        }
        Ok(())
    }
}

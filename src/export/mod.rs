pub mod html_debug_export;
pub mod html_table_export;
pub mod json_export;
pub mod text_export;

use anyhow::Result;

use crate::core::model::DocumentFinal;

pub use html_debug_export::HtmlDebugExporter;
pub use html_table_export::HtmlTableExporter;
pub use json_export::JsonExporter;
pub use text_export::TextExporter;

/// Serializes recovered tables. Cells arrive row-major, then left to right.
pub trait Exporter {
    fn export(&self, document: &DocumentFinal) -> Result<()>;
}

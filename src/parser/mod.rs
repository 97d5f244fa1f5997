pub mod pdf_reader;
pub mod text_extractor;

pub use pdf_reader::{is_pdf, PdfReader};
pub use text_extractor::{NoTextExtractor, PdftotextExtractor, TextExtractor};

pub mod image_file;
pub mod renderer;

pub use image_file::ImageFileRasterizer;
pub use renderer::PdfRasterizer;

use anyhow::Result;
use image::DynamicImage;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub image: DynamicImage,
    /// Where the raster lives on disk, if it was written anywhere.
    pub path: Option<PathBuf>,
}

/// Produces exactly one raster for one page of a source document.
pub trait PageRasterizer {
    fn render(&self, document: &Path, page_idx: usize) -> Result<RenderedPage>;
}

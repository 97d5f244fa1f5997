use anyhow::{Context, Result};
use std::path::Path;

use crate::raster::{PageRasterizer, RenderedPage};

/// Treats an already rasterized image file as a one-page document.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileRasterizer;

impl ImageFileRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRasterizer for ImageFileRasterizer {
    fn render(&self, document: &Path, page_idx: usize) -> Result<RenderedPage> {
        if page_idx != 0 {
            anyhow::bail!(
                "{} is a single image; page {} does not exist",
                document.display(),
                page_idx + 1
            );
        }
        let image = image::open(document)
            .with_context(|| format!("failed to decode image {}", document.display()))?;
        Ok(RenderedPage {
            image,
            path: Some(document.to_path_buf()),
        })
    }
}

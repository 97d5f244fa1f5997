use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use crate::core::geometry::PixelRect;

/// Returns the plain text inside a pixel region of one page.
pub trait TextExtractor {
    fn extract_text(&self, document: &Path, page_idx: usize, region: PixelRect) -> Result<String>;
}

/// Crops text out of a PDF page with poppler's `pdftotext`.
///
/// The crop box is given in pixels of a raster rendered at `dpi`; passing the
/// same resolution to `pdftotext` keeps both tools in one coordinate space.
#[derive(Debug, Clone)]
pub struct PdftotextExtractor {
    dpi: u32,
}

impl PdftotextExtractor {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    fn command(&self, document: &Path, page_idx: usize, region: PixelRect) -> Command {
        let page_number = (page_idx + 1).to_string();
        let mut cmd = Command::new("pdftotext");
        cmd.arg("-f")
            .arg(&page_number)
            .arg("-l")
            .arg(&page_number)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-x")
            .arg(region.x.to_string())
            .arg("-y")
            .arg(region.y.to_string())
            .arg("-W")
            .arg(region.width.to_string())
            .arg("-H")
            .arg(region.height.to_string())
            .arg("-layout")
            .arg("-nopgbrk")
            .arg(document)
            .arg("-");
        cmd
    }
}

impl TextExtractor for PdftotextExtractor {
    fn extract_text(&self, document: &Path, page_idx: usize, region: PixelRect) -> Result<String> {
        let output = self
            .command(document, page_idx, region)
            .output()
            .with_context(|| "failed to invoke pdftotext; is poppler-utils installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("pdftotext failed with status {}: {stderr}", output.status);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extractor for sources with no text layer, such as scanned images.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTextExtractor;

impl TextExtractor for NoTextExtractor {
    fn extract_text(&self, _document: &Path, _page_idx: usize, _region: PixelRect) -> Result<String> {
        Ok(String::new())
    }
}

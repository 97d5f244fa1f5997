use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::raster::{PageRasterizer, RenderedPage};

/// Renders PDF pages to grayscale PNG with poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdfRasterizer {
    out_dir: PathBuf,
    dpi: u32,
}

impl PdfRasterizer {
    pub fn new(out_dir: PathBuf, dpi: u32) -> Self {
        Self { out_dir, dpi }
    }

    /// Output prefix for a 1-based page; `-singlefile` writes `<prefix>.png`.
    fn prefix(&self, page_number: usize) -> PathBuf {
        self.out_dir.join(format!("page_{page_number:03}"))
    }

    fn command(&self, document: &Path, page_number: usize, prefix: &str) -> Command {
        let page = page_number.to_string();
        let mut cmd = Command::new("pdftoppm");
        cmd.arg("-gray")
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(&page)
            .arg("-l")
            .arg(&page)
            .arg(document)
            .arg(prefix);
        cmd
    }
}

impl PageRasterizer for PdfRasterizer {
    fn render(&self, document: &Path, page_idx: usize) -> Result<RenderedPage> {
        fs::create_dir_all(&self.out_dir)?;

        // pdftoppm uses 1-based page indices
        let page_number = page_idx + 1;
        let prefix = self.prefix(page_number);
        let prefix_str = prefix
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF8 output path not supported"))?;

        let status = self
            .command(document, page_number, prefix_str)
            .status()
            .with_context(|| "failed to invoke pdftoppm; is poppler-utils installed?")?;

        if !status.success() {
            anyhow::bail!("pdftoppm failed with status: {status}");
        }

        // -singlefile writes `<prefix>.png` without a page suffix
        let image_path = prefix.with_extension("png");
        if !image_path.exists() {
            anyhow::bail!(
                "expected rendered image not found: {}",
                image_path.display()
            );
        }

        let image = image::open(&image_path)
            .with_context(|| format!("failed to decode {}", image_path.display()))?;
        debug!(
            page = page_number,
            width = image.width(),
            height = image.height(),
            dpi = self.dpi,
            "page rendered"
        );

        Ok(RenderedPage {
            image,
            path: Some(image_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_gray_page_per_invocation() {
        let rasterizer = PdfRasterizer::new(PathBuf::from("work/pages"), 200);
        let cmd = rasterizer.command(Path::new("in.pdf"), 4, "work/pages/page_004");
        let args: Vec<String> = cmd
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(cmd.get_program(), "pdftoppm");
        assert_eq!(
            args,
            vec![
                "-gray", "-png", "-singlefile", "-r", "200", "-f", "4", "-l", "4", "in.pdf",
                "work/pages/page_004",
            ]
        );
    }

    #[test]
    fn single_file_output_lands_next_to_prefix() {
        let rasterizer = PdfRasterizer::new(PathBuf::from("work/pages"), 150);
        let prefix = rasterizer.prefix(12);
        assert_eq!(prefix, PathBuf::from("work/pages/page_012"));
        assert_eq!(
            prefix.with_extension("png"),
            PathBuf::from("work/pages/page_012.png")
        );
    }
}

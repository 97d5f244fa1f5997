use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct PdfReader {
    path: PathBuf,
}

impl PdfReader {
    pub fn new(path: PathBuf) -> Result<Self> {
        if !is_pdf(&path)? {
            anyhow::bail!("not a PDF file: {}", path.display());
        }
        Ok(Self { path })
    }

    pub fn page_count(&self) -> Result<usize> {
        get_page_count(&self.path)
    }
}

/// Sniff the `%PDF-` header rather than trusting the extension.
pub fn is_pdf(path: &Path) -> Result<bool> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 5];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(&magic == b"%PDF-"),
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

fn get_page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to invoke pdfinfo on {}", pdf_path.display()))?;

    if !output.status.success() {
        anyhow::bail!("pdfinfo failed with status: {}", output.status);
    }

    parse_page_count(&String::from_utf8_lossy(&output.stdout)).with_context(|| {
        format!(
            "pdfinfo output did not contain a 'Pages:' line for {}",
            pdf_path.display()
        )
    })
}

fn parse_page_count(pdfinfo: &str) -> Result<usize> {
    for line in pdfinfo.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let num_str = rest.trim();
            let pages: usize = num_str.parse().with_context(|| {
                format!("failed to parse page count from 'Pages:' line: {num_str}")
            })?;
            return Ok(pages);
        }
    }
    anyhow::bail!("missing 'Pages:' line")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_pdfinfo_pages_line() {
        let out = "Title:          report\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_page_count(out).expect("pages"), 12);
        assert!(parse_page_count("Title: x\n").is_err());
    }

    #[test]
    fn sniffs_pdf_header() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("gridtable-sniff-{}", std::process::id()));
        fs::create_dir_all(&dir)?;
        let pdf = dir.join("a.pdf");
        let png = dir.join("a.png");
        fs::write(&pdf, b"%PDF-1.7\n%...")?;
        fs::write(&png, b"\x89PNG")?;

        assert!(is_pdf(&pdf)?);
        assert!(!is_pdf(&png)?);
        assert!(PdfReader::new(png).is_err());

        let _ = fs::remove_dir_all(&dir);
        Ok(())
    }
}

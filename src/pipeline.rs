use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::core::error::GridError;
use crate::core::model::{DocumentFinal, TableFinal};
use crate::core::pages::PageSelection;
use crate::core::params::GridParams;
use crate::export::{
    Exporter, HtmlDebugExporter, HtmlTableExporter, JsonExporter, TextExporter,
};
use crate::grid::{assemble_table, GridAnalysis, TableDetector};
use crate::parser::{is_pdf, NoTextExtractor, PdfReader, PdftotextExtractor, TextExtractor};
use crate::raster::{ImageFileRasterizer, PageRasterizer, PdfRasterizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Json,
    Text,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub dpi: u32,
    pub pages: Option<PageSelection>,
    pub params: GridParams,
    pub formats: Vec<OutputFormat>,
    pub debug: bool,
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf, dpi: u32) -> Self {
        Self {
            input,
            output,
            dpi,
            pages: None,
            params: GridParams::default(),
            formats: vec![OutputFormat::Html, OutputFormat::Json],
            debug: false,
        }
    }

    pub fn with_pages(mut self, pages: Option<PageSelection>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_params(mut self, params: GridParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_formats(mut self, formats: Vec<OutputFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn debug_dir(&self) -> Option<PathBuf> {
        self.debug.then(|| self.output.join("debug"))
    }
}

/// Recover one table per selected page of a PDF, or from a single image file.
pub fn build_document(config: &PipelineConfig) -> Result<DocumentFinal> {
    let detector = TableDetector::new(config.params)?;
    let debug_dir = config.debug_dir();

    if is_pdf(&config.input)? {
        let reader = PdfReader::new(config.input.clone())?;
        let page_count = reader.page_count()?;
        let indices = match &config.pages {
            Some(selection) => selection.indices(page_count),
            None => (0..page_count).collect(),
        };
        if indices.is_empty() {
            anyhow::bail!(
                "no pages selected ({} has {page_count} page(s))",
                config.input.display()
            );
        }

        let rasterizer = PdfRasterizer::new(config.output.join("pages"), config.dpi);
        let extractor = PdftotextExtractor::new(config.dpi);
        let pages = indices
            .into_iter()
            .map(|page_idx| {
                process_page(
                    &detector,
                    &rasterizer,
                    &extractor,
                    &config.input,
                    page_idx,
                    debug_dir.as_deref(),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(DocumentFinal { pages })
    } else {
        let page = process_page(
            &detector,
            &ImageFileRasterizer::new(),
            &NoTextExtractor,
            &config.input,
            0,
            debug_dir.as_deref(),
        )?;
        Ok(DocumentFinal { pages: vec![page] })
    }
}

/// Rasterize, analyze and assemble one page.
#[instrument(skip_all, fields(document = %document.display(), page = page_idx + 1))]
pub fn process_page(
    detector: &TableDetector,
    rasterizer: &dyn PageRasterizer,
    extractor: &dyn TextExtractor,
    document: &Path,
    page_idx: usize,
    debug_dir: Option<&Path>,
) -> Result<TableFinal> {
    let rendered = rasterizer
        .render(document, page_idx)
        .map_err(|err| GridError::collaborator("page rasterizer", err))?;
    let analysis = detector.analyze(&rendered.image)?;

    if let Some(dir) = debug_dir {
        write_debug_masks(&analysis, dir, page_idx)?;
    }

    let mut table = assemble_table(&analysis, page_idx, |region| {
        extractor.extract_text(document, page_idx, region)
    });
    table.raster = rendered.path;

    info!(
        page = page_idx + 1,
        rows = table.grid.rows,
        cols = table.grid.cols,
        cells = table.cells.len(),
        "page processed"
    );
    Ok(table)
}

fn write_debug_masks(analysis: &GridAnalysis, dir: &Path, page_idx: usize) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let page_number = page_idx + 1;
    let outputs = [
        ("hseps", analysis.masks.horizontal.as_gray()),
        ("vseps", analysis.masks.vertical.as_gray()),
        ("table", analysis.combined.as_gray()),
    ];
    for (name, mask) in outputs {
        let path = dir.join(format!("page_{page_number:03}_{name}.png"));
        mask.save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

pub fn export_document(document: &DocumentFinal, config: &PipelineConfig) -> Result<()> {
    let output = config.output.as_path();
    for format in &config.formats {
        match format {
            OutputFormat::Html => HtmlTableExporter::new(output.to_path_buf()).export(document)?,
            OutputFormat::Json => JsonExporter::new(output.to_path_buf()).export(document)?,
            OutputFormat::Text => TextExporter::new(output.to_path_buf()).export(document)?,
        }
    }

    if let Some(dir) = config.debug_dir() {
        HtmlDebugExporter::new(dir).export(document)?;
    }

    Ok(())
}

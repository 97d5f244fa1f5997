//! Table grid recovery from a page raster.
//!
//! The stages run in order: binarize the page, mark long uniform black runs as
//! separators in two scan masks, collapse each mask to ordered line positions,
//! then sample the combined mask on every interior boundary to find merged
//! cells. [`assemble::assemble_table`] turns the result into cell descriptors.

pub mod assemble;
pub mod entropy;
pub mod lines;
pub mod mask;
pub mod preprocess;
pub mod separators;
pub mod spans;

use image::DynamicImage;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::core::error::GridResult;
use crate::core::params::GridParams;

pub use assemble::{assemble_table, plan_cells, CellPlan};
pub use lines::GridLines;
pub use mask::{CombinedMask, SeparatorMask};
pub use preprocess::{preprocess, BinaryImage, PageImage};
pub use separators::{SeparatorDetector, SeparatorMasks};
pub use spans::SpanMap;

#[derive(Debug, Clone)]
pub struct TableDetector {
    params: GridParams,
}

impl TableDetector {
    pub fn new(params: GridParams) -> GridResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn analyze(&self, image: &DynamicImage) -> GridResult<GridAnalysis> {
        let binary = preprocess(image, self.params.binarize_threshold)?;
        Ok(self.analyze_binary(&binary))
    }

    pub fn analyze_page(&self, page: &PageImage) -> GridAnalysis {
        self.analyze_binary(&page.binarize(self.params.binarize_threshold))
    }

    #[instrument(skip_all, fields(width = binary.width(), height = binary.height()))]
    fn analyze_binary(&self, binary: &BinaryImage) -> GridAnalysis {
        let masks = SeparatorDetector::new(&self.params).detect(binary);
        let lines = GridLines::from_masks(&masks.horizontal, &masks.vertical);
        debug!(
            row_lines = ?lines.row_starts(),
            col_lines = ?lines.col_starts(),
            "grid lines extracted"
        );
        let combined = masks.horizontal.combine(&masks.vertical);
        let spans = SpanMap::analyze(&lines, &combined);

        GridAnalysis {
            width: binary.width(),
            height: binary.height(),
            lines,
            spans,
            masks,
            combined,
        }
    }
}

/// Everything recovered from one page. Read-only once built.
#[derive(Debug, Clone)]
pub struct GridAnalysis {
    pub width: u32,
    pub height: u32,
    pub lines: GridLines,
    pub spans: SpanMap,
    pub masks: SeparatorMasks,
    pub combined: CombinedMask,
}

impl GridAnalysis {
    pub fn plan(&self) -> Vec<CellPlan> {
        plan_cells(&self.lines, &self.spans, self.width, self.height)
    }

    pub fn report(&self) -> GridReport<'_> {
        GridReport {
            width: self.width,
            height: self.height,
            lines: &self.lines,
            spans: &self.spans,
        }
    }
}

/// Serializable view of the detected lines and span flags.
#[derive(Debug, Serialize)]
pub struct GridReport<'a> {
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub lines: &'a GridLines,
    #[serde(flatten)]
    pub spans: &'a SpanMap,
}

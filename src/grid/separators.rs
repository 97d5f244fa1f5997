use tracing::debug;

use crate::core::params::{GridParams, WindowParams};
use crate::grid::entropy::shannon_entropy;
use crate::grid::mask::{MaskBuilder, SeparatorMask};
use crate::grid::preprocess::{BinaryImage, BLACK};

/// The two independent scan results for one page.
#[derive(Debug, Clone)]
pub struct SeparatorMasks {
    pub horizontal: SeparatorMask,
    pub vertical: SeparatorMask,
}

/// Marks long uniform black runs as separator pixels.
///
/// Each window of the binary image is scored by its Shannon entropy. A window
/// below the entropy threshold whose first pixel is black is a ruling segment,
/// while text mixes glyphs and background and scores higher.
#[derive(Debug, Clone, Copy)]
pub struct SeparatorDetector {
    horizontal: WindowParams,
    vertical: WindowParams,
    entropy_threshold: f64,
}

impl SeparatorDetector {
    pub fn new(params: &GridParams) -> Self {
        Self {
            horizontal: params.horizontal,
            vertical: params.vertical,
            entropy_threshold: params.entropy_threshold,
        }
    }

    pub fn detect(&self, binary: &BinaryImage) -> SeparatorMasks {
        let horizontal = self.scan_rows(binary);
        let vertical = self.scan_columns(binary);
        SeparatorMasks {
            horizontal,
            vertical,
        }
    }

    fn scan_rows(&self, binary: &BinaryImage) -> SeparatorMask {
        let window = self.horizontal;
        let mut builder = MaskBuilder::new(binary.width(), binary.height());
        let mut marked = 0usize;
        for y in 0..binary.height() {
            for x in window_starts(binary.width(), window) {
                let strip = (x..x + window.length).map(|col| binary.pixel(col, y));
                if self.is_separator(strip, binary.pixel(x, y)) {
                    builder.mark_horizontal_run(x, y, window.length);
                    marked += 1;
                }
            }
        }
        debug!(windows = marked, length = window.length, "horizontal separator scan");
        builder.freeze()
    }

    fn scan_columns(&self, binary: &BinaryImage) -> SeparatorMask {
        let window = self.vertical;
        let mut builder = MaskBuilder::new(binary.width(), binary.height());
        let mut marked = 0usize;
        for x in 0..binary.width() {
            for y in window_starts(binary.height(), window) {
                let strip = (y..y + window.length).map(|row| binary.pixel(x, row));
                if self.is_separator(strip, binary.pixel(x, y)) {
                    builder.mark_vertical_run(x, y, window.length);
                    marked += 1;
                }
            }
        }
        debug!(windows = marked, length = window.length, "vertical separator scan");
        builder.freeze()
    }

    fn is_separator(&self, strip: impl Iterator<Item = u8>, first: u8) -> bool {
        first == BLACK && shannon_entropy(strip) < self.entropy_threshold
    }
}

/// Window origins along an axis: `0, stride, ..` while `start < extent - length`.
fn window_starts(extent: u32, window: WindowParams) -> impl Iterator<Item = u32> {
    (0..extent.saturating_sub(window.length)).step_by(window.stride as usize)
}

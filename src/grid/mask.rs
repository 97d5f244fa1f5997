use std::ops::Range;

use image::{GrayImage, Luma};

use crate::grid::preprocess::{BLACK, WHITE};

/// Mutable stage of a [`SeparatorMask`]. Starts all white (no separator).
#[derive(Debug, Clone)]
pub struct MaskBuilder {
    pixels: GrayImage,
}

impl MaskBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: GrayImage::from_pixel(width, height, Luma([WHITE])),
        }
    }

    /// Mark `len` pixels of row `y` starting at column `x`.
    pub fn mark_horizontal_run(&mut self, x: u32, y: u32, len: u32) {
        let end = (x + len).min(self.pixels.width());
        for col in x..end {
            self.pixels.put_pixel(col, y, Luma([BLACK]));
        }
    }

    /// Mark `len` pixels of column `x` starting at row `y`.
    pub fn mark_vertical_run(&mut self, x: u32, y: u32, len: u32) {
        let end = (y + len).min(self.pixels.height());
        for row in y..end {
            self.pixels.put_pixel(x, row, Luma([BLACK]));
        }
    }

    pub fn freeze(self) -> SeparatorMask {
        SeparatorMask {
            pixels: self.pixels,
        }
    }
}

/// Frozen separator mask: 0 under a detected separator run, 255 elsewhere.
#[derive(Debug, Clone)]
pub struct SeparatorMask {
    pixels: GrayImage,
}

impl SeparatorMask {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_separator(&self, x: u32, y: u32) -> bool {
        self.pixels.get_pixel(x, y).0[0] == BLACK
    }

    /// Integer mean of every row. 255 only for rows without any separator pixel.
    pub fn row_profile(&self) -> Vec<u8> {
        let width = u64::from(self.width());
        (0..self.height())
            .map(|y| {
                let sum: u64 = (0..self.width())
                    .map(|x| u64::from(self.pixels.get_pixel(x, y).0[0]))
                    .sum();
                mean_to_u8(sum, width)
            })
            .collect()
    }

    /// Integer mean of every column.
    pub fn col_profile(&self) -> Vec<u8> {
        let height = u64::from(self.height());
        (0..self.width())
            .map(|x| {
                let sum: u64 = (0..self.height())
                    .map(|y| u64::from(self.pixels.get_pixel(x, y).0[0]))
                    .sum();
                mean_to_u8(sum, height)
            })
            .collect()
    }

    /// Pixelwise product of two masks: white only where both are white.
    pub fn combine(&self, other: &SeparatorMask) -> CombinedMask {
        let pixels = GrayImage::from_fn(self.width(), self.height(), |x, y| {
            let open = !self.is_separator(x, y) && !other.is_separator(x, y);
            Luma([if open { WHITE } else { BLACK }])
        });
        CombinedMask { pixels }
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.pixels
    }
}

fn mean_to_u8(sum: u64, count: u64) -> u8 {
    u8::try_from(sum / count.max(1)).unwrap_or(WHITE)
}

#[derive(Debug, Clone)]
pub struct CombinedMask {
    pixels: GrayImage,
}

impl CombinedMask {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_open(&self, x: u32, y: u32) -> bool {
        self.pixels.get_pixel(x, y).0[0] == WHITE
    }

    /// True when every pixel in the region is white. An empty region is open.
    pub fn region_is_open(&self, xs: Range<u32>, ys: Range<u32>) -> bool {
        let xs = xs.start..xs.end.min(self.width());
        let ys = ys.start..ys.end.min(self.height());
        ys.clone()
            .all(|y| xs.clone().all(|x| self.is_open(x, y)))
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.pixels
    }
}

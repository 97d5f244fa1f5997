use image::{DynamicImage, GrayImage, Luma};

use crate::core::error::{GridError, GridResult};

pub const BLACK: u8 = 0;
pub const WHITE: u8 = 255;

/// Grayscale page raster. Never zero-area.
#[derive(Debug, Clone)]
pub struct PageImage {
    pixels: GrayImage,
}

impl PageImage {
    /// Convert any decoded raster to 8-bit grayscale. Luma8 input is kept as is.
    pub fn from_dynamic(image: &DynamicImage) -> GridResult<Self> {
        Self::from_gray(image.to_luma8())
    }

    pub fn from_gray(pixels: GrayImage) -> GridResult<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(GridError::InvalidImage(format!(
                "page raster has zero area ({width}x{height})"
            )));
        }
        Ok(Self { pixels })
    }

    /// Wrap a row-major luma buffer.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> GridResult<Self> {
        let len = data.len();
        let pixels = GrayImage::from_raw(width, height, data).ok_or_else(|| {
            GridError::InvalidImage(format!(
                "buffer of {len} bytes does not match {width}x{height}"
            ))
        })?;
        Self::from_gray(pixels)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Hard threshold: below `threshold` is black, everything else white.
    pub fn binarize(&self, threshold: u8) -> BinaryImage {
        let pixels = GrayImage::from_fn(self.width(), self.height(), |x, y| {
            let value = self.pixels.get_pixel(x, y).0[0];
            Luma([if value < threshold { BLACK } else { WHITE }])
        });
        BinaryImage { pixels }
    }
}

/// Pure black/white variant of a [`PageImage`], used for separator sampling.
#[derive(Debug, Clone)]
pub struct BinaryImage {
    pixels: GrayImage,
}

impl BinaryImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y).0[0]
    }
}

/// Gray conversion followed by binarization.
pub fn preprocess(image: &DynamicImage, threshold: u8) -> GridResult<BinaryImage> {
    Ok(PageImage::from_dynamic(image)?.binarize(threshold))
}

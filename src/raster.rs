//! Label raster decoding
//!
//! Semantic and instance maps are single-channel images whose pixel values
//! are label ids, not intensities. Decoding must preserve the raw values:
//! the usual 8-bit → 16-bit intensity rescaling would turn class 5 into
//! 1285, so the conversion is done per sample format here, and anything
//! that is not 8- or 16-bit grayscale is rejected outright rather than
//! run through a label-corrupting luminance conversion.

use std::path::Path;

use image::DynamicImage;

use crate::error::ConvertError;

/// A 2-D grid of per-pixel label ids, row-major.
///
/// Holds either semantic class ids or instance ids depending on the source
/// raster; value 0 always means unlabeled/background.
#[derive(Debug, Clone)]
pub struct LabelRaster {
    width: u32,
    height: u32,
    data: Vec<u16>,
}

impl LabelRaster {
    /// Decode a label raster from an image file.
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let img = image::open(path).map_err(|e| ConvertError::Image {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_dynamic(img, path)
    }

    /// Build a raster from a decoded image, widening pixel values without
    /// rescaling them. `path` only names the source in the error when the
    /// image is not 8- or 16-bit grayscale.
    pub fn from_dynamic(img: DynamicImage, path: &Path) -> Result<Self, ConvertError> {
        let (width, height) = (img.width(), img.height());
        let data = match img {
            DynamicImage::ImageLuma16(buf) => buf.into_raw(),
            DynamicImage::ImageLuma8(buf) => buf.into_raw().into_iter().map(u16::from).collect(),
            other => {
                return Err(ConvertError::UnsupportedColorType {
                    path: path.to_path_buf(),
                    color: other.color(),
                })
            }
        };
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a raster from raw row-major values. Panics if the length does
    /// not match the dimensions; intended for tests and synthetic inputs.
    pub fn from_vec(width: u32, height: u32, data: Vec<u16>) -> Self {
        assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "label data length must equal width * height"
        );
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u16] {
        &self.data
    }

    /// Largest label value present, 0 for an empty or all-background grid.
    pub fn max_value(&self) -> u16 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    pub fn same_dimensions(&self, other: &LabelRaster) -> bool {
        self.width == other.width && self.height == other.height
    }
}

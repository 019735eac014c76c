//! Binary mask encoding
//!
//! Turns a 0/1 instance mask into the COCO region representation: a
//! segmentation (simplified boundary polygons or uncompressed RLE), a
//! bounding box and a pixel area. The encoder sits behind a narrow trait so
//! the geometry backend can be swapped without touching the pipeline.

use image::{GrayImage, Luma};
use imageproc::contours::find_contours;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

use crate::coco::Segmentation;
use crate::config::SegmentationMode;

/// The COCO-facing description of one encoded mask.
#[derive(Debug, Clone)]
pub struct Region {
    pub segmentation: Segmentation,
    pub bbox: [f64; 4], // [x, y, width, height]
    pub area: f64,
}

/// Encode a binary mask into a COCO region descriptor.
///
/// Returns `None` for degenerate masks (no foreground pixels, or no
/// boundary ring survives simplification); callers skip those instances
/// without emitting an annotation.
pub trait MaskEncoder {
    fn encode(&self, mask: &GrayImage) -> Option<Region>;
}

/// Contour-tracing encoder with Douglas-Peucker boundary simplification.
#[derive(Debug, Clone)]
pub struct ContourMaskEncoder {
    tolerance: f64,
    mode: SegmentationMode,
}

impl ContourMaskEncoder {
    pub fn new(tolerance: f64, mode: SegmentationMode) -> Self {
        Self { tolerance, mode }
    }
}

impl MaskEncoder for ContourMaskEncoder {
    fn encode(&self, mask: &GrayImage) -> Option<Region> {
        let (bbox, area) = foreground_extent(mask)?;

        let segmentation = match self.mode {
            SegmentationMode::Polygon => {
                let rings = trace_polygons(mask, self.tolerance);
                if rings.is_empty() {
                    return None;
                }
                Segmentation::Polygon(rings)
            }
            SegmentationMode::Rle => encode_rle(mask),
        };

        Some(Region {
            segmentation,
            bbox,
            area,
        })
    }
}

/// Bounding box `[x, y, w, h]` and area of the foreground pixels, or `None`
/// when the mask is empty.
fn foreground_extent(mask: &GrayImage) -> Option<([f64; 4], f64)> {
    let mut count = 0u64;
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] != 0 {
            count += 1;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if count == 0 {
        return None;
    }

    let bbox = [
        f64::from(min_x),
        f64::from(min_y),
        f64::from(max_x - min_x + 1),
        f64::from(max_y - min_y + 1),
    ];
    Some((bbox, count as f64))
}

/// Trace the boundary rings of a mask and simplify each with the given
/// tolerance.
///
/// The mask is padded by one pixel before tracing so instances touching the
/// image border still produce closed rings; coordinates are shifted back
/// afterwards and clamped to be non-negative. Rings that collapse below
/// three vertices are dropped.
fn trace_polygons(mask: &GrayImage, tolerance: f64) -> Vec<Vec<f64>> {
    let (width, height) = mask.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] != 0 {
            padded.put_pixel(x + 1, y + 1, Luma([1u8]));
        }
    }

    let mut rings = Vec::new();
    for contour in find_contours::<i32>(&padded) {
        let curve: Vec<Point<f64>> = contour
            .points
            .iter()
            .map(|p| Point::new(f64::from(p.x) - 1.0, f64::from(p.y) - 1.0))
            .collect();
        let simplified = if tolerance > 0.0 {
            approximate_polygon_dp(&curve, tolerance, true)
        } else {
            curve
        };
        if simplified.len() < 3 {
            continue;
        }
        let mut flat = Vec::with_capacity(simplified.len() * 2);
        for point in simplified {
            flat.push(point.x.max(0.0));
            flat.push(point.y.max(0.0));
        }
        rings.push(flat);
    }
    rings
}

/// Uncompressed COCO RLE: column-major runs alternating background and
/// foreground, starting with background.
fn encode_rle(mask: &GrayImage) -> Segmentation {
    let (width, height) = mask.dimensions();
    let mut counts = Vec::new();
    let mut prev = 0u8;
    let mut run = 0u32;
    for x in 0..width {
        for y in 0..height {
            let v = u8::from(mask.get_pixel(x, y)[0] != 0);
            if v != prev {
                counts.push(run);
                run = 0;
                prev = v;
            }
            run += 1;
        }
    }
    counts.push(run);
    Segmentation::Rle {
        size: [height, width],
        counts,
    }
}

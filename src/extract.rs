//! Instance extraction
//!
//! Cross-references the semantic raster (per-pixel class) with the
//! instance raster (per-pixel instance id) to produce one binary mask plus
//! a resolved class id per valid instance. An instance is valid only when
//! every pixel it owns carries the same non-zero semantic class.

use std::collections::BTreeSet;

use image::GrayImage;
use log::warn;

use crate::error::ConvertError;
use crate::raster::LabelRaster;

/// A derived instance: its id in the instance raster, the single semantic
/// class it resolved to, and its 0/1 pixel mask.
#[derive(Debug, Clone)]
pub struct InstanceMask {
    pub index: u16,
    pub class_id: u32,
    pub mask: GrayImage,
}

/// Lazy iterator over the valid instances of one image.
///
/// Walks instance ids `0..=max(instance raster)`. Id 0 denotes background
/// and never yields, regardless of what the semantic raster says under it.
/// Ambiguous instances (more than one non-zero class under the mask) are
/// dropped with a diagnostic naming the instance index and the image id;
/// purely background instances are skipped silently.
#[derive(Debug)]
pub struct Instances<'a> {
    semantic: &'a LabelRaster,
    instance: &'a LabelRaster,
    image_id: u32,
    next: u32,
    max: u32,
}

impl<'a> Instances<'a> {
    /// Fails when the two rasters disagree on dimensions.
    pub fn over(
        semantic: &'a LabelRaster,
        instance: &'a LabelRaster,
        image_id: u32,
    ) -> Result<Self, ConvertError> {
        if !semantic.same_dimensions(instance) {
            return Err(ConvertError::DimensionMismatch {
                sem_width: semantic.width(),
                sem_height: semantic.height(),
                ins_width: instance.width(),
                ins_height: instance.height(),
            });
        }
        Ok(Self {
            semantic,
            instance,
            image_id,
            next: 0,
            max: u32::from(instance.max_value()),
        })
    }

    /// Distinct values of the semantic raster masked to instance `j`,
    /// with 0 standing in for every pixel outside the instance.
    fn distinct_overlap(&self, j: u16) -> BTreeSet<u16> {
        self.instance
            .pixels()
            .iter()
            .zip(self.semantic.pixels())
            .map(|(&ins, &sem)| if ins == j { sem } else { 0 })
            .collect()
    }

    fn binary_mask(&self, j: u16) -> GrayImage {
        let data = self
            .instance
            .pixels()
            .iter()
            .map(|&ins| u8::from(ins == j))
            .collect();
        GrayImage::from_raw(self.instance.width(), self.instance.height(), data)
            .expect("mask buffer matches raster dimensions")
    }
}

impl Iterator for Instances<'_> {
    type Item = InstanceMask;

    fn next(&mut self) -> Option<InstanceMask> {
        while self.next <= self.max {
            let j = self.next as u16;
            self.next += 1;
            // Id 0 is the background marker, never an object.
            if j == 0 {
                continue;
            }

            let distinct = self.distinct_overlap(j);
            if distinct.len() > 2 {
                warn!(
                    "instance {} of image {} has more than one semantic label, skipping",
                    j, self.image_id
                );
                continue;
            }
            // With at most {0, class} present, the largest value is the
            // class; 0 alone means background or an absent id.
            let class_id = distinct.into_iter().next_back().unwrap_or(0);
            if class_id == 0 {
                continue;
            }

            return Some(InstanceMask {
                index: j,
                class_id: u32::from(class_id),
                mask: self.binary_mask(j),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(width: u32, height: u32, data: &[u16]) -> LabelRaster {
        LabelRaster::from_vec(width, height, data.to_vec())
    }

    #[test]
    fn resolves_single_class_instances() {
        // Instance 1 under class 5, instance 2 under class 7.
        let instance = raster(3, 2, &[0, 1, 1, 0, 2, 2]);
        let semantic = raster(3, 2, &[0, 5, 5, 0, 7, 7]);
        let found: Vec<_> = Instances::over(&semantic, &instance, 1).unwrap().collect();
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].index, found[0].class_id), (1, 5));
        assert_eq!((found[1].index, found[1].class_id), (2, 7));
        assert_eq!(found[0].mask.as_raw(), &[0, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn ambiguous_instance_is_dropped() {
        // Instance 2 straddles classes 5 and 7; instance 1 stays on class 5.
        let instance = raster(4, 1, &[1, 1, 2, 2]);
        let semantic = raster(4, 1, &[5, 5, 5, 7]);
        let found: Vec<_> = Instances::over(&semantic, &instance, 3).unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].index, found[0].class_id), (1, 5));
    }

    #[test]
    fn semantically_unlabeled_instance_is_skipped() {
        let instance = raster(2, 2, &[0, 1, 1, 0]);
        let semantic = raster(2, 2, &[0, 0, 0, 0]);
        let found: Vec<_> = Instances::over(&semantic, &instance, 1).unwrap().collect();
        assert!(found.is_empty());
    }

    #[test]
    fn instance_partly_on_semantic_background_keeps_its_class() {
        // Mask covers one class-9 pixel and one unlabeled pixel: {0, 9}.
        let instance = raster(2, 1, &[1, 1]);
        let semantic = raster(2, 1, &[9, 0]);
        let found: Vec<_> = Instances::over(&semantic, &instance, 1).unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].class_id, 9);
    }

    #[test]
    fn sparse_instance_ids_are_tolerated() {
        // Id 2 never occurs; only id 3 should surface.
        let instance = raster(3, 1, &[0, 3, 3]);
        let semantic = raster(3, 1, &[0, 4, 4]);
        let found: Vec<_> = Instances::over(&semantic, &instance, 1).unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 3);
    }

    #[test]
    fn empty_instance_raster_yields_nothing() {
        let instance = raster(2, 2, &[0; 4]);
        let semantic = raster(2, 2, &[1, 2, 3, 4]);
        let found: Vec<_> = Instances::over(&semantic, &instance, 1).unwrap().collect();
        assert!(found.is_empty());
    }

    #[test]
    fn background_id_never_yields_even_under_a_single_class() {
        // All-background instance raster over a one-class semantic raster:
        // id 0 projects onto {0, 9}, but must not surface as an object.
        let instance = raster(2, 2, &[0; 4]);
        let semantic = raster(2, 2, &[0, 9, 9, 0]);
        let found: Vec<_> = Instances::over(&semantic, &instance, 1).unwrap().collect();
        assert!(found.is_empty());
    }

    static CAPTURED: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

    struct CapturingLogger;

    impl log::Log for CapturingLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                CAPTURED.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn ambiguity_diagnostic_names_instance_and_image() {
        static LOGGER: CapturingLogger = CapturingLogger;
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Warn);

        // Instance 2 straddles classes 5 and 7 in image 7.
        let instance = raster(4, 1, &[0, 0, 2, 2]);
        let semantic = raster(4, 1, &[0, 0, 5, 7]);
        let found: Vec<_> = Instances::over(&semantic, &instance, 7).unwrap().collect();
        assert!(found.is_empty());

        let messages = CAPTURED.lock().unwrap();
        assert!(
            messages
                .iter()
                .any(|m| m.contains("instance 2") && m.contains("image 7")),
            "expected a warning naming instance 2 and image 7, got {:?}",
            *messages
        );
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let instance = raster(2, 2, &[0; 4]);
        let semantic = raster(3, 2, &[0; 6]);
        let err = Instances::over(&semantic, &instance, 1).unwrap_err();
        assert!(matches!(err, ConvertError::DimensionMismatch { .. }));
    }
}

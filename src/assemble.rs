//! COCO document assembly
//!
//! Drives the whole conversion: one worker per sample decodes the rasters,
//! extracts instances and encodes their masks; a sequential merge in input
//! order then assigns the run-global ids. Image ids are the sample's
//! 1-based position; annotation ids form a gap-free sequence that advances
//! only when an annotation is actually appended, so the result is identical
//! whether the per-image stage runs in parallel or not.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::catalog::{self, ClassMapping};
use crate::coco::{Annotation, CocoFile, Image};
use crate::discover::SampleFiles;
use crate::error::ConvertError;
use crate::extract::Instances;
use crate::mask::{MaskEncoder, Region};
use crate::raster::LabelRaster;

/// An encoded instance waiting for its run-global annotation id.
struct PendingAnnotation {
    class_id: u32,
    region: Region,
}

/// Convert all samples into a complete COCO document.
pub fn build<E>(
    mapping: &ClassMapping,
    samples: &[SampleFiles],
    encoder: &E,
) -> Result<CocoFile, ConvertError>
where
    E: MaskEncoder + Sync,
{
    info!("Converting {} samples...", samples.len());
    let pb = create_progress_bar(samples.len() as u64);

    let per_image: Vec<Result<(Image, Vec<PendingAnnotation>), ConvertError>> = samples
        .par_iter()
        .enumerate()
        .map(|(position, sample)| {
            let result = process_sample(position as u32 + 1, sample, encoder);
            pb.inc(1);
            result
        })
        .collect();
    pb.finish_with_message("Conversion complete");

    // Deterministic merge: input order fixes image ids, append order fixes
    // annotation ids.
    let mut document = CocoFile::with_categories(catalog::categories(mapping));
    let mut segmentation_id = 1u32;
    for result in per_image {
        let (image, pending) = result?;
        let image_id = image.id;
        document.images.push(image);
        for annotation in pending {
            document.annotations.push(Annotation {
                id: segmentation_id,
                image_id,
                category_id: annotation.class_id,
                segmentation: annotation.region.segmentation,
                bbox: annotation.region.bbox,
                area: annotation.region.area,
                iscrowd: false,
            });
            segmentation_id += 1;
        }
    }

    info!(
        "Assembled {} images and {} annotations",
        document.images.len(),
        document.annotations.len()
    );
    Ok(document)
}

/// Process one sample: image dimensions, raster decoding, instance
/// extraction and mask encoding. Degenerate masks are dropped silently.
fn process_sample<E>(
    image_id: u32,
    sample: &SampleFiles,
    encoder: &E,
) -> Result<(Image, Vec<PendingAnnotation>), ConvertError>
where
    E: MaskEncoder,
{
    // Header-only read; the image pixels themselves are never needed.
    let (width, height) =
        image::image_dimensions(&sample.image).map_err(|e| ConvertError::Image {
            path: sample.image.clone(),
            source: e,
        })?;
    let file_name = sample
        .image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let image = Image::new(image_id, file_name, width, height);

    let semantic = LabelRaster::open(&sample.semantic)?;
    let instance = LabelRaster::open(&sample.instance)?;

    let mut pending = Vec::new();
    for found in Instances::over(&semantic, &instance, image_id)? {
        if let Some(region) = encoder.encode(&found.mask) {
            pending.push(PendingAnnotation {
                class_id: found.class_id,
                region,
            });
        }
    }
    debug!(
        "image {}: {} annotated instances",
        image_id,
        pending.len()
    );
    Ok((image, pending))
}

/// Refuse to run against a pre-existing output file.
pub fn ensure_fresh_output(path: &Path) -> Result<(), ConvertError> {
    if path.exists() {
        return Err(ConvertError::OutputExists(path.to_path_buf()));
    }
    Ok(())
}

/// Serialize the document to disk; the sole write of the run.
pub fn write_output(document: &CocoFile, path: &Path) -> Result<(), ConvertError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, document)?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [Images] [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .progress_chars("#>-"),
    );
    pb
}

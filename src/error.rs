use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a conversion run.
///
/// Per-instance conditions (ambiguous labels, degenerate masks) are not
/// errors: the offending instance is dropped and processing continues.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("label table {}: {reason}", .path.display())]
    DataSource { path: PathBuf, reason: String },

    #[error(
        "discovered file collections are misaligned: \
         {images} images, {semantic} semantic maps, {instance} instance maps"
    )]
    Alignment {
        images: usize,
        semantic: usize,
        instance: usize,
    },

    #[error("input directory does not exist or is not a directory: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error(
        "raster dimensions differ: semantic map is {sem_width}x{sem_height}, \
         instance map is {ins_width}x{ins_height}"
    )]
    DimensionMismatch {
        sem_width: u32,
        sem_height: u32,
        ins_width: u32,
        ins_height: u32,
    },

    #[error(
        "unsupported color type {color:?} in {}, label rasters must be \
         8- or 16-bit grayscale",
        .path.display()
    )]
    UnsupportedColorType {
        path: PathBuf,
        color: image::ColorType,
    },

    #[error("failed to decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

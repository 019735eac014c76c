//! ISI to COCO format converter
//!
//! This library converts image/semantic/instance (ISI) raster annotation
//! datasets (one semantic-class map and one instance-index map per image)
//! into a single COCO-style object-detection/segmentation JSON file.

pub mod assemble;
pub mod catalog;
pub mod coco;
pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod mask;
pub mod raster;

// Re-export commonly used types and functions
pub use assemble::{build, ensure_fresh_output, write_output};
pub use catalog::{categories, CatalogSource, ClassMapping, TableCatalog};
pub use coco::{Annotation, Category, CocoFile, Image, Segmentation};
pub use config::{Args, SegmentationMode};
pub use discover::{pair, DirTripleDiscoverer, FileDiscoverer, SampleFiles};
pub use error::ConvertError;
pub use extract::{InstanceMask, Instances};
pub use mask::{ContourMaskEncoder, MaskEncoder, Region};
pub use raster::LabelRaster;

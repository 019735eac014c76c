//! COCO format data structures
//!
//! The output document of a conversion run: `info`, `licenses`,
//! `categories`, `images` and `annotations`, serialized as a single JSON
//! file matching the COCO detection/segmentation schema.

use serde::{Deserialize, Serialize};

/// COCO dataset information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub description: String,
    pub url: String,
    pub version: String,
    pub year: i32,
    pub contributor: String,
    pub date_created: String,
}

impl Default for Info {
    fn default() -> Self {
        use chrono::Datelike;
        let now = chrono::Utc::now();
        Self {
            description: "Converted from ISI raster annotations".to_string(),
            url: String::new(),
            version: "0.1.0".to_string(),
            year: now.year(),
            contributor: "isi2coco".to_string(),
            date_created: now.naive_utc().to_string(),
        }
    }
}

/// COCO license information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: u32,
    pub name: String,
    pub url: String,
}

impl Default for License {
    fn default() -> Self {
        Self {
            id: 1,
            name: "NA".to_string(),
            url: String::new(),
        }
    }
}

/// COCO category information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub supercategory: String,
}

/// COCO image information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: u32,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub license: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_captured: Option<String>,
}

impl Image {
    pub fn new(id: u32, file_name: String, width: u32, height: u32) -> Self {
        Self {
            id,
            file_name,
            width,
            height,
            license: 1,
            date_captured: None,
        }
    }
}

/// Segmentation payload of an annotation.
///
/// Either a list of polygon rings (flat `[x0, y0, x1, y1, ...]` each) or an
/// uncompressed COCO RLE with column-major counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segmentation {
    Polygon(Vec<Vec<f64>>),
    Rle { size: [u32; 2], counts: Vec<u32> },
}

/// COCO annotation information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u32,
    pub image_id: u32,
    pub category_id: u32,
    pub segmentation: Segmentation,
    pub bbox: [f64; 4], // [x, y, width, height]
    pub area: f64,
    pub iscrowd: bool,
}

/// Complete COCO dataset structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CocoFile {
    pub info: Info,
    pub licenses: Vec<License>,
    pub categories: Vec<Category>,
    pub images: Vec<Image>,
    pub annotations: Vec<Annotation>,
}

impl CocoFile {
    /// Create an empty document with the given category list.
    pub fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            info: Info::default(),
            licenses: vec![License::default()],
            categories,
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

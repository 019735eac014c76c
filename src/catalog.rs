//! Label catalog loading
//!
//! Maps semantic class ids to human-readable names and produces the COCO
//! `categories` list. The table format is dataset-specific, so loading sits
//! behind the [`CatalogSource`] trait; swapping datasets means swapping the
//! source, not the pipeline.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::coco::Category;
use crate::error::ConvertError;

/// Mapping from positive class id to class name.
///
/// Id 0 is reserved for "unlabeled" and never appears as a key. A BTreeMap
/// keeps iteration order stable so the emitted category list is
/// reproducible across runs.
pub type ClassMapping = BTreeMap<u32, String>;

/// Source of the class-id → class-name table.
pub trait CatalogSource {
    fn load(&self) -> Result<ClassMapping, ConvertError>;
}

/// Reads a delimited two-column (id, name) text table, one class per line.
///
/// Lines are split on the configured delimiter; a non-numeric first column
/// on the first line is treated as a header and skipped. This covers the
/// ADE20K `objectInfo150.txt` layout with `delimiter = '\t'` and plain
/// id,name CSV files with `delimiter = ','`.
#[derive(Debug, Clone)]
pub struct TableCatalog {
    path: PathBuf,
    delimiter: char,
}

impl TableCatalog {
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> ConvertError {
        ConvertError::DataSource {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }
}

impl CatalogSource for TableCatalog {
    fn load(&self) -> Result<ClassMapping, ConvertError> {
        let content = fs::read_to_string(&self.path).map_err(|e| ConvertError::DataSource {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let mut mapping = ClassMapping::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split(self.delimiter);
            let id_field = fields.next().unwrap_or_default().trim();
            let id: u32 = match id_field.parse() {
                Ok(id) => id,
                // First line may be a header row
                Err(_) if lineno == 0 => continue,
                Err(_) => {
                    return Err(
                        self.malformed(format!("line {}: invalid class id {:?}", lineno + 1, id_field))
                    )
                }
            };
            if id == 0 {
                return Err(self.malformed(format!(
                    "line {}: class id 0 is reserved for unlabeled pixels",
                    lineno + 1
                )));
            }
            let name = match fields.next() {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => {
                    return Err(
                        self.malformed(format!("line {}: missing class name", lineno + 1))
                    )
                }
            };
            if mapping.insert(id, name).is_some() {
                return Err(self.malformed(format!("line {}: duplicate class id {}", lineno + 1, id)));
            }
        }

        if mapping.is_empty() {
            return Err(self.malformed("no class entries found"));
        }
        Ok(mapping)
    }
}

/// Build the COCO `categories` list from a class mapping.
///
/// One entry per class, in mapping order, with `supercategory` fixed to
/// `"NA"`.
pub fn categories(mapping: &ClassMapping) -> Vec<Category> {
    mapping
        .iter()
        .map(|(&id, name)| Category {
            id,
            name: name.clone(),
            supercategory: "NA".to_string(),
        })
        .collect()
}

/// Convenience constructor for the common tab-separated table layout.
pub fn tsv_catalog(path: &Path) -> TableCatalog {
    TableCatalog::new(path, '\t')
}

//! Dataset file discovery
//!
//! Finds the three parallel file collections (images, semantic maps,
//! instance maps) and pairs them positionally. Pairing trusts the lexical
//! sort of each directory: the n-th image goes with the n-th semantic map
//! and the n-th instance map. The directory layout is dataset-specific, so
//! discovery sits behind the [`FileDiscoverer`] trait.

use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::ConvertError;

/// One dataset sample: an image and its two label rasters.
#[derive(Debug, Clone)]
pub struct SampleFiles {
    pub image: PathBuf,
    pub semantic: PathBuf,
    pub instance: PathBuf,
}

/// Source of the three parallel file collections.
pub trait FileDiscoverer {
    /// Returns `(images, semantic_maps, instance_maps)`, each sorted
    /// lexically by path string.
    fn discover(&self) -> Result<(Vec<PathBuf>, Vec<PathBuf>, Vec<PathBuf>), ConvertError>;
}

/// Lists three flat directories and sorts each independently.
///
/// The caller's directories must be curated so that lexical sort yields
/// matching triples; misalignment across the three is not detectable here.
#[derive(Debug, Clone)]
pub struct DirTripleDiscoverer {
    pub image_dir: PathBuf,
    pub semantic_dir: PathBuf,
    pub instance_dir: PathBuf,
}

impl DirTripleDiscoverer {
    pub fn new(
        image_dir: impl Into<PathBuf>,
        semantic_dir: impl Into<PathBuf>,
        instance_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            image_dir: image_dir.into(),
            semantic_dir: semantic_dir.into(),
            instance_dir: instance_dir.into(),
        }
    }
}

impl FileDiscoverer for DirTripleDiscoverer {
    fn discover(&self) -> Result<(Vec<PathBuf>, Vec<PathBuf>, Vec<PathBuf>), ConvertError> {
        Ok((
            list_sorted(&self.image_dir)?,
            list_sorted(&self.semantic_dir)?,
            list_sorted(&self.instance_dir)?,
        ))
    }
}

/// List every file directly under `dir`, sorted lexically by path string.
///
/// A missing directory is an error, not an empty dataset: a mistyped path
/// must not let the run "succeed" with zero samples.
fn list_sorted(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    if !dir.is_dir() {
        return Err(ConvertError::MissingDirectory(dir.to_path_buf()));
    }
    let pattern = format!("{}/*", dir.display());
    let entries = glob(&pattern).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(glob::GlobError::into_error)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    Ok(files)
}

/// Pair the three collections positionally into sample triples.
///
/// Fails with [`ConvertError::Alignment`] when the lengths differ.
pub fn pair(
    images: Vec<PathBuf>,
    semantic: Vec<PathBuf>,
    instance: Vec<PathBuf>,
) -> Result<Vec<SampleFiles>, ConvertError> {
    if images.len() != semantic.len() || images.len() != instance.len() {
        return Err(ConvertError::Alignment {
            images: images.len(),
            semantic: semantic.len(),
            instance: instance.len(),
        });
    }
    Ok(images
        .into_iter()
        .zip(semantic)
        .zip(instance)
        .map(|((image, semantic), instance)| SampleFiles {
            image,
            semantic,
            instance,
        })
        .collect())
}

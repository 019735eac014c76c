use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// Command-line arguments for converting ISI raster annotations to COCO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the dataset images
    #[arg(short = 'i', long = "image_dir")]
    pub image_dir: PathBuf,

    /// Directory containing the semantic segmentation maps
    #[arg(short = 's', long = "semantic_dir")]
    pub semantic_dir: PathBuf,

    /// Directory containing the instance segmentation maps
    #[arg(short = 'n', long = "instance_dir")]
    pub instance_dir: PathBuf,

    /// Path to the class-id/class-name label table
    #[arg(short = 'l', long = "label_table")]
    pub label_table: PathBuf,

    /// Field delimiter of the label table
    #[arg(long = "label_delimiter", default_value_t = '\t')]
    pub label_delimiter: char,

    /// Path of the COCO JSON file to write; must not already exist
    #[arg(short = 'o', long = "output", default_value = "output.json")]
    pub output: PathBuf,

    /// Boundary simplification tolerance in pixels
    #[arg(long = "tolerance", default_value_t = 2.0, value_parser = validate_tolerance)]
    pub tolerance: f64,

    /// Segmentation representation to emit: 'polygon' or 'rle'
    #[arg(
        long = "segmentation",
        visible_alias = "mode",
        value_enum,
        default_value = "polygon"
    )]
    pub segmentation: SegmentationMode,
}

// Enumeration for the segmentation output representation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum SegmentationMode {
    Polygon,
    Rle,
}

// Validate that the tolerance is a non-negative pixel distance
fn validate_tolerance(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if val >= 0.0 && val.is_finite() => Ok(val),
        _ => Err("TOLERANCE must be a non-negative number".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_must_be_non_negative() {
        assert!(validate_tolerance("0").is_ok());
        assert!(validate_tolerance("2.5").is_ok());
        assert!(validate_tolerance("-1").is_err());
        assert!(validate_tolerance("inf").is_err());
        assert!(validate_tolerance("abc").is_err());
    }
}

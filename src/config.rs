use clap::Parser;
use std::str::FromStr;

/// Command-line arguments for converting CholecT50 JSON annotations to YOLO labels.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory containing the annotation JSON files
    #[arg(short = 'd', long = "json_dir")]
    pub json_dir: String,

    /// Base directory for the per-video label directories
    #[arg(short = 'o', long = "output_dir", default_value = "yolo_annotations")]
    pub output_dir: String,

    /// Glob pattern matched inside json_dir
    #[arg(long = "pattern", default_value = "*.json")]
    pub pattern: String,

    /// Width of the video frames in pixels
    #[arg(long = "image_width", default_value_t = 1920, value_parser = validate_dimension)]
    pub image_width: u32,

    /// Height of the video frames in pixels
    #[arg(long = "image_height", default_value_t = 1080, value_parser = validate_dimension)]
    pub image_height: u32,

    /// Category type used for the class mapping and dataset.yaml
    #[arg(long = "category_type", default_value = "instrument")]
    pub category_type: String,

    /// Export triplet classes instead of category_type
    #[arg(long = "use_triplet_class")]
    pub use_triplet_class: bool,

    /// Write a `{class_id}: {class_name}` mapping file to this path
    #[arg(long = "class_mapping")]
    pub class_mapping: Option<String>,

    /// Write a YOLO dataset configuration to this path
    #[arg(long = "dataset_yaml")]
    pub dataset_yaml: Option<String>,

    /// Training images path referenced by dataset.yaml
    #[arg(long = "train_path", default_value = "images/train")]
    pub train_path: String,

    /// Validation images path referenced by dataset.yaml
    #[arg(long = "val_path", default_value = "images/val")]
    pub val_path: String,

    /// Convert documents in parallel
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Hide the progress bar
    #[arg(long = "no_progress")]
    pub no_progress: bool,
}

// Validate that an image dimension is a positive integer
fn validate_dimension(s: &str) -> Result<u32, String> {
    match u32::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("dimension must be a positive integer".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dimension() {
        assert_eq!(validate_dimension("1920"), Ok(1920));
        assert!(validate_dimension("0").is_err());
        assert!(validate_dimension("-5").is_err());
        assert!(validate_dimension("abc").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["cholect2yolo", "-d", "labels"]);
        assert_eq!(args.json_dir, "labels");
        assert_eq!(args.output_dir, "yolo_annotations");
        assert_eq!(args.pattern, "*.json");
        assert_eq!(args.image_width, 1920);
        assert_eq!(args.image_height, 1080);
        assert_eq!(args.category_type, "instrument");
        assert!(!args.use_triplet_class);
        assert!(!args.parallel);
        assert!(args.class_mapping.is_none());
    }

    #[test]
    fn test_rejects_zero_width() {
        let parsed = Args::try_parse_from(["cholect2yolo", "-d", "labels", "--image_width", "0"]);
        assert!(parsed.is_err());
    }
}

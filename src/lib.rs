//! CholecT50 to YOLO label converter
//!
//! This library converts per-video surgical action annotations into per-frame
//! single-class YOLO label files, one output directory per video.

pub mod batch;
pub mod config;
pub mod conversion;
pub mod error;
pub mod geometry;
pub mod io;
pub mod label;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use batch::{run_batch, BatchOptions, BatchReport};
pub use config::Args;
pub use conversion::{convert_document, label_file_name, AnnotationConverter};
pub use error::{ConvertError, LabelError};
pub use geometry::{denormalize, normalize};
pub use io::{create_class_mapping_file, create_dataset_yaml, find_annotation_files};
pub use label::extract_frame_label;
pub use types::{
    AnnotationDocument, BatchSummary, Categories, ClassMapping, ConversionResult, FrameKey,
    NormalizedBox, PixelBox,
};

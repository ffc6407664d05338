use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::Args;
use crate::error::ConvertError;
use crate::geometry::normalize;
use crate::label::extract_frame_label;
use crate::types::{
    AnnotationDocument, ConversionResult, FrameKey, NormalizedBox, PixelBox, DEFAULT_CATEGORY,
    TRIPLET_CATEGORY,
};
use crate::utils::{create_output_directory, file_stem, read_and_parse_json};

/// Converts annotation documents into per-frame label files.
///
/// Holds configuration only. Categories travel with each document and are
/// returned in its [`ConversionResult`], so one converter can serve any number
/// of documents, including from several threads at once.
#[derive(Debug, Clone)]
pub struct AnnotationConverter {
    pub image_width: u32,
    pub image_height: u32,
    pub category_type: String,
    pub use_triplet_class: bool,
}

impl Default for AnnotationConverter {
    fn default() -> Self {
        Self {
            image_width: 1920,
            image_height: 1080,
            category_type: DEFAULT_CATEGORY.to_string(),
            use_triplet_class: false,
        }
    }
}

impl AnnotationConverter {
    pub fn from_args(args: &Args) -> Self {
        Self {
            image_width: args.image_width,
            image_height: args.image_height,
            category_type: args.category_type.clone(),
            use_triplet_class: args.use_triplet_class,
        }
    }

    /// Category type used for the class mapping and dataset exports
    pub fn export_category(&self) -> &str {
        if self.use_triplet_class {
            TRIPLET_CATEGORY
        } else {
            &self.category_type
        }
    }

    pub fn normalize_box(&self, bbox: &PixelBox) -> NormalizedBox {
        normalize(bbox, self.image_width, self.image_height)
    }

    /// Load the document at `json_path` and convert it into `output_dir`.
    /// Load failures are returned to the caller untouched.
    pub fn convert(
        &self,
        json_path: &Path,
        output_dir: &Path,
    ) -> Result<ConversionResult, ConvertError> {
        let document = read_and_parse_json(json_path)?;
        convert_document(document, &file_stem(json_path), output_dir)
    }
}

/// Write one label file per labelled frame of `document` into `output_dir`.
///
/// `fallback_video_id` is used when the document has no `video` field.
pub fn convert_document(
    document: AnnotationDocument,
    fallback_video_id: &str,
    output_dir: &Path,
) -> Result<ConversionResult, ConvertError> {
    let video_id = document
        .video_id()
        .unwrap_or_else(|| fallback_video_id.to_string());
    let AnnotationDocument {
        categories,
        annotations,
        ..
    } = document;

    let frames = match annotations {
        Value::Object(frames) => frames,
        _ => {
            warn!("{}: 'annotations' is not a mapping; skipping.", video_id);
            let mut result = ConversionResult::empty(video_id, categories);
            result.structural_skip = true;
            return Ok(result);
        }
    };

    create_output_directory(output_dir)?;

    let mut result = ConversionResult::empty(video_id, categories);
    let mut written: HashSet<String> = HashSet::new();
    for (frame_key, frame_annotations) in sorted_frames(frames.iter()) {
        let label = match extract_frame_label(frame_annotations) {
            Ok(Some(label)) => label,
            Ok(None) => {
                result.skipped_empty += 1;
                continue;
            }
            Err(e) => {
                warn!("{}: skipping frame {}: {}", result.video_id, frame_key, e);
                result.skipped_malformed += 1;
                continue;
            }
        };

        // Keys such as "1" and "01", or "a/b" and "ab", share a file name; the
        // first frame in sort order keeps it.
        let file_name = label_file_name(&result.video_id, &frame_key);
        if !written.insert(file_name.clone()) {
            warn!(
                "{}: frame {} maps to already written {}; skipping.",
                result.video_id, frame_key, file_name
            );
            result.skipped_duplicate += 1;
            continue;
        }

        write_label_file(&output_dir.join(&file_name), &label)?;
        result.converted += 1;
    }

    if result.skipped_malformed > 0 || result.skipped_duplicate > 0 {
        info!(
            "{}: converted {} frames; skipped {} empty, {} malformed, {} duplicate.",
            result.video_id,
            result.converted,
            result.skipped_empty,
            result.skipped_malformed,
            result.skipped_duplicate
        );
    } else {
        info!(
            "{}: converted {} frames; skipped {} empty.",
            result.video_id, result.converted, result.skipped_empty
        );
    }
    info!("Output saved to: {}", output_dir.display());

    Ok(result)
}

/// Order frames numerically first, then opaque keys lexicographically
pub fn sorted_frames<'a, I>(frames: I) -> Vec<(FrameKey, &'a Value)>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    let mut frames: Vec<_> = frames
        .into_iter()
        .map(|(key, value)| (FrameKey::parse(key), value))
        .collect();
    frames.sort_by(|(a, _), (b, _)| a.cmp(b));
    frames
}

/// `VID_{video_id}_{frame:06}.txt` for numeric frames, `VID_{video_id}_{key}.txt` otherwise
pub fn label_file_name(video_id: &str, frame_key: &FrameKey) -> String {
    let name = format!("VID_{}_{}.txt", video_id, frame_key);
    sanitize_filename::sanitize(name)
}

fn write_label_file(path: &Path, label: &str) -> Result<(), ConvertError> {
    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", label.trim())?;
        writer.flush()
    };
    write().map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}

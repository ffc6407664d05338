use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Mapping from class-id string to class name, e.g. `"0" -> "grasper"`
pub type ClassMapping = BTreeMap<String, String>;

/// Mapping from category type (`instrument`, `verb`, `target`, `triplet`, ...) to its classes
pub type Categories = BTreeMap<String, ClassMapping>;

// Category type selected by `--use_triplet_class`
pub const TRIPLET_CATEGORY: &str = "triplet";

// Default category type used for exports
pub const DEFAULT_CATEGORY: &str = "instrument";

fn empty_object() -> Value {
    Value::Object(Map::new())
}

// Categories only feed the exports, so a badly shaped entry is dropped with a
// warning instead of rejecting the document.
fn lenient_categories<'de, D>(deserializer: D) -> Result<Categories, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let entries = match raw {
        Value::Object(entries) => entries,
        Value::Null => return Ok(Categories::new()),
        other => {
            warn!("'categories' is not a mapping; ignoring: {}", other);
            return Ok(Categories::new());
        }
    };

    let mut categories = Categories::new();
    for (category_type, classes) in entries {
        let Value::Object(classes) = classes else {
            warn!("Category '{}' is not a mapping; ignoring.", category_type);
            continue;
        };
        let mut mapping = ClassMapping::new();
        for (id, name) in classes {
            match name {
                Value::String(name) => {
                    mapping.insert(id, name);
                }
                Value::Number(n) => {
                    mapping.insert(id, n.to_string());
                }
                other => warn!(
                    "Class '{}' of category '{}' has no usable name: {}",
                    id, category_type, other
                ),
            }
        }
        categories.insert(category_type, mapping);
    }
    Ok(categories)
}

// The AnnotationDocument struct representing one video's annotation record
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnnotationDocument {
    #[serde(default, deserialize_with = "lenient_categories")]
    pub categories: Categories,
    /// Kept untyped so a non-mapping value can be reported as a structural skip
    /// instead of failing the whole parse.
    #[serde(default = "empty_object")]
    pub annotations: Value,
    #[serde(default)]
    pub video: Option<Value>,
}

impl AnnotationDocument {
    /// The document's own video identifier, if it carries a usable one.
    /// An empty string counts as absent so file names never read `VID__...`.
    pub fn video_id(&self) -> Option<String> {
        match &self.video {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Frame annotations when `annotations` is mapping-shaped
    pub fn frames(&self) -> Option<&Map<String, Value>> {
        self.annotations.as_object()
    }
}

/// Frame identifier, numeric when the raw key parses as an integer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameKey {
    Numeric(i64),
    Opaque(String),
}

impl FrameKey {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(index) => FrameKey::Numeric(index),
            Err(_) => FrameKey::Opaque(raw.to_string()),
        }
    }
}

// Numeric keys first in ascending order, then opaque keys lexicographically
impl Ord for FrameKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FrameKey::Numeric(a), FrameKey::Numeric(b)) => a.cmp(b),
            (FrameKey::Numeric(_), FrameKey::Opaque(_)) => Ordering::Less,
            (FrameKey::Opaque(_), FrameKey::Numeric(_)) => Ordering::Greater,
            (FrameKey::Opaque(a), FrameKey::Opaque(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for FrameKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKey::Numeric(index) => write!(f, "{:06}", index),
            FrameKey::Opaque(key) => f.write_str(key),
        }
    }
}

/// Box in pixel units: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    pub x1: f64,
    pub y1: f64,
    pub width: f64,
    pub height: f64,
}

/// Box in YOLO form: center plus size, every value in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

// Per-document conversion summary
#[derive(Debug, Default, Clone)]
pub struct ConversionResult {
    pub video_id: String,
    pub converted: usize,
    pub skipped_empty: usize,
    pub skipped_malformed: usize,
    /// Frames whose file name was already written for this document
    pub skipped_duplicate: usize,
    /// Set when `annotations` was not a mapping and nothing was written
    pub structural_skip: bool,
    /// Categories of the converted document, handed back to the caller
    pub categories: Categories,
}

impl ConversionResult {
    pub fn empty(video_id: String, categories: Categories) -> Self {
        Self {
            video_id,
            categories,
            ..Default::default()
        }
    }
}

// Struct to hold batch statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents_attempted: usize,
    pub documents_succeeded: usize,
    pub documents_failed: usize,
    pub documents_skipped: usize,
    pub files_produced: usize,
    pub frames_skipped_empty: usize,
    pub frames_skipped_malformed: usize,
    pub frames_skipped_duplicate: usize,
}

impl BatchSummary {
    pub fn record_success(&mut self, result: &ConversionResult) {
        self.documents_attempted += 1;
        if result.structural_skip {
            self.documents_skipped += 1;
        } else {
            self.documents_succeeded += 1;
        }
        self.files_produced += result.converted;
        self.frames_skipped_empty += result.skipped_empty;
        self.frames_skipped_malformed += result.skipped_malformed;
        self.frames_skipped_duplicate += result.skipped_duplicate;
    }

    pub fn record_failure(&mut self) {
        self.documents_attempted += 1;
        self.documents_failed += 1;
    }

    pub fn print_summary(&self) {
        log::info!("=== Conversion Summary ===");
        log::info!("Documents attempted: {}", self.documents_attempted);
        log::info!("Documents converted: {}", self.documents_succeeded);
        log::info!("Label files produced: {}", self.files_produced);
        log::info!("Empty frames skipped: {}", self.frames_skipped_empty);

        if self.documents_skipped > 0 {
            log::warn!(
                "Documents skipped (annotations not a mapping): {}",
                self.documents_skipped
            );
        }
        if self.frames_skipped_malformed > 0 {
            log::warn!(
                "Frames skipped (malformed class id): {}",
                self.frames_skipped_malformed
            );
        }
        if self.frames_skipped_duplicate > 0 {
            log::warn!(
                "Frames skipped (file name already written): {}",
                self.frames_skipped_duplicate
            );
        }
        if self.documents_failed > 0 {
            log::warn!("Documents failed: {}", self.documents_failed);
        }
    }
}

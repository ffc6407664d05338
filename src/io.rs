use glob::glob;
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::types::{Categories, ClassMapping};

/// Collect the annotation files in `dirname` matching `pattern`, sorted by path
pub fn find_annotation_files(dirname: &Path, pattern: &str) -> Vec<PathBuf> {
    let json_pattern = format!("{}/{}", dirname.display(), pattern);
    let mut json_files: Vec<PathBuf> = match glob(&json_pattern) {
        Ok(paths) => paths
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("Skipping unreadable path: {}", e);
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect(),
        Err(e) => {
            warn!("Invalid glob pattern {:?}: {}", json_pattern, e);
            Vec::new()
        }
    };
    json_files.sort();
    json_files
}

/// Classes of `category_type`, ordered by numeric class id
pub fn sorted_classes<'a>(
    categories: &'a Categories,
    category_type: &str,
) -> Result<Vec<(i64, &'a str)>, ConvertError> {
    let classes: &ClassMapping = categories
        .get(category_type)
        .ok_or_else(|| ConvertError::MissingCategory(category_type.to_string()))?;

    let mut sorted = classes
        .iter()
        .map(|(id, name)| {
            id.trim()
                .parse::<i64>()
                .map(|id| (id, name.as_str()))
                .map_err(|_| ConvertError::InvalidClassId(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    sorted.sort_by_key(|&(id, _)| id);
    Ok(sorted)
}

fn write_text(path: &Path, content: &str) -> Result<(), ConvertError> {
    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(content.as_bytes())?;
        writer.flush()
    };
    write().map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Create the class mapping file, one `{class_id}: {class_name}` line per class
pub fn create_class_mapping_file(
    output_path: &Path,
    categories: &Categories,
    category_type: &str,
) -> Result<(), ConvertError> {
    let mut content = String::new();
    for (id, name) in sorted_classes(categories, category_type)? {
        content.push_str(&format!("{}: {}\n", id, name));
    }
    write_text(output_path, &content)?;
    info!("Class mapping saved to: {}", output_path.display());
    Ok(())
}

// Single-quoted YAML scalar
fn yaml_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml(
    output_path: &Path,
    train_path: &str,
    val_path: &str,
    categories: &Categories,
    category_type: &str,
) -> Result<(), ConvertError> {
    let classes = sorted_classes(categories, category_type)?;
    let names: Vec<String> = classes.iter().map(|&(_, name)| yaml_quote(name)).collect();

    let yaml_content = format!(
        "# Dataset configuration for YOLO\ntrain: {}\nval: {}\n\n# Number of classes\nnc: {}\n\n# Class names\nnames: [{}]\n",
        train_path,
        val_path,
        classes.len(),
        names.join(", ")
    );
    write_text(output_path, &yaml_content)?;
    info!("YAML config saved to: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn categories() -> Categories {
        serde_json::from_value(serde_json::json!({
            "instrument": {"10": "irrigator", "2": "hook", "0": "grasper"},
            "triplet": {"0": "grasper,dissect,cystic_plate"},
            "broken": {"x": "unknown"}
        }))
        .unwrap()
    }

    #[test]
    fn test_sorted_classes_numeric_order() {
        let cats = categories();
        let classes = sorted_classes(&cats, "instrument").unwrap();
        assert_eq!(classes, vec![(0, "grasper"), (2, "hook"), (10, "irrigator")]);
    }

    #[test]
    fn test_sorted_classes_errors() {
        let cats = categories();
        assert!(matches!(
            sorted_classes(&cats, "verb"),
            Err(ConvertError::MissingCategory(_))
        ));
        assert!(matches!(
            sorted_classes(&cats, "broken"),
            Err(ConvertError::InvalidClassId(_))
        ));
    }

    #[test]
    fn test_yaml_quote() {
        assert_eq!(yaml_quote("grasper"), "'grasper'");
        assert_eq!(yaml_quote("surgeon's hook"), "'surgeon''s hook'");
    }

    #[test]
    fn test_find_annotation_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("VID02.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("VID01.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let files = find_annotation_files(temp_dir.path(), "*.json");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["VID01.json", "VID02.json"]);
    }
}

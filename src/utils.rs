use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::ConvertError;
use crate::types::AnnotationDocument;

/// Read and parse an annotation document, streaming from the file instead of
/// loading it into memory first. A missing or unreadable file and malformed JSON
/// are reported as distinct errors.
pub fn read_and_parse_json(path: &Path) -> Result<AnnotationDocument, ConvertError> {
    let file = fs::File::open(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        ConvertError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    debug!("Loaded JSON: {}", path.display());
    Ok(document)
}

/// File name without its extension, used for video ids and output subdirectories
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Create a directory and its parents; an existing directory is left untouched
pub fn create_output_directory(path: &Path) -> Result<PathBuf, ConvertError> {
    fs::create_dir_all(path).map_err(|source| ConvertError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_errors_are_distinct() {
        let temp_dir = tempfile::tempdir().unwrap();

        let missing = temp_dir.path().join("missing.json");
        let err = read_and_parse_json(&missing).unwrap_err();
        assert!(matches!(err, ConvertError::Read { .. }));

        let broken = temp_dir.path().join("broken.json");
        let mut file = fs::File::create(&broken).unwrap();
        file.write_all(b"{\"annotations\": {").unwrap();
        let err = read_and_parse_json(&broken).unwrap_err();
        assert!(matches!(err, ConvertError::Parse { .. }));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_create_output_directory_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("a/b/c");
        create_output_directory(&dir).unwrap();
        fs::write(dir.join("keep.txt"), "1\n").unwrap();

        create_output_directory(&dir).unwrap();
        assert!(dir.join("keep.txt").exists());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("labels/VID01.json")), "VID01");
        assert_eq!(file_stem(Path::new("")), "");
    }
}

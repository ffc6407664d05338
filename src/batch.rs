use indicatif::ProgressBar;
use log::{error, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::conversion::AnnotationConverter;
use crate::error::ConvertError;
use crate::types::{BatchSummary, ConversionResult};
use crate::utils::{create_progress_bar, file_stem};

/// Outcome of one document in a batch
pub type DocumentOutcome = (PathBuf, Result<ConversionResult, ConvertError>);

/// Options for a batch run
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub parallel: bool,
    pub show_progress: bool,
}

/// Per-document outcomes of a batch run, in source order, with totals
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
    pub summary: BatchSummary,
}

impl BatchReport {
    /// First successfully converted document's result, used for the exports
    pub fn first_success(&self) -> Option<&ConversionResult> {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.as_ref().ok())
            .find(|result| !result.structural_skip)
    }
}

fn convert_one(
    converter: &AnnotationConverter,
    json_path: &Path,
    output_base_dir: &Path,
) -> Result<ConversionResult, ConvertError> {
    let output_dir = output_base_dir.join(file_stem(json_path));
    info!("Converting {}...", json_path.display());
    converter.convert(json_path, &output_dir).inspect_err(|e| {
        error!("Error converting {}: {}", json_path.display(), e);
    })
}

/// Convert every source into `output_base_dir/<stem>`.
///
/// A failing document is logged and recorded; the remaining documents are
/// still converted. Nothing is retried.
pub fn run_batch(
    converter: &AnnotationConverter,
    json_files: &[PathBuf],
    output_base_dir: &Path,
    options: BatchOptions,
) -> BatchReport {
    let pb = if options.show_progress {
        create_progress_bar(json_files.len() as u64, "Converting")
    } else {
        ProgressBar::hidden()
    };

    let run = |json_path: &PathBuf| -> DocumentOutcome {
        let outcome = convert_one(converter, json_path, output_base_dir);
        pb.inc(1);
        (json_path.clone(), outcome)
    };

    let outcomes: Vec<DocumentOutcome> = if options.parallel {
        json_files.par_iter().map(run).collect()
    } else {
        json_files.iter().map(run).collect()
    };
    pb.finish_and_clear();

    let mut summary = BatchSummary::default();
    for (_, outcome) in &outcomes {
        match outcome {
            Ok(result) => summary.record_success(result),
            Err(_) => summary.record_failure(),
        }
    }

    BatchReport { outcomes, summary }
}

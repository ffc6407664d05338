use clap::Parser;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use cholect2yolo::{
    create_class_mapping_file, create_dataset_yaml, find_annotation_files, run_batch, Args,
    AnnotationConverter, BatchOptions, BatchReport,
};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let dirname = PathBuf::from(&args.json_dir);
    if !dirname.exists() {
        error!("The specified json_dir does not exist: {}", args.json_dir);
        return;
    }

    let json_files = find_annotation_files(&dirname, &args.pattern);
    if json_files.is_empty() {
        warn!("No json files found in {}", args.json_dir);
        return;
    }

    info!("Starting the conversion of {} files...", json_files.len());

    let converter = AnnotationConverter::from_args(&args);
    let output_base = PathBuf::from(&args.output_dir);
    let options = BatchOptions {
        parallel: args.parallel,
        show_progress: !args.no_progress,
    };
    let report = run_batch(&converter, &json_files, &output_base, options);
    report.summary.print_summary();

    write_exports(&args, &converter, &report);

    info!("Converted {} files.", json_files.len());
    info!("Output saved under: {}", output_base.display());
}

fn write_exports(args: &Args, converter: &AnnotationConverter, report: &BatchReport) {
    if args.class_mapping.is_none() && args.dataset_yaml.is_none() {
        return;
    }

    let Some(first) = report.first_success() else {
        warn!("No categories loaded; skipping class mapping and dataset.yaml.");
        return;
    };
    let category_type = converter.export_category();

    if let Some(path) = &args.class_mapping {
        if let Err(e) = create_class_mapping_file(Path::new(path), &first.categories, category_type)
        {
            error!("Failed to create class mapping: {}", e);
        }
    }

    if let Some(path) = &args.dataset_yaml {
        if let Err(e) = create_dataset_yaml(
            Path::new(path),
            &args.train_path,
            &args.val_path,
            &first.categories,
            category_type,
        ) {
            error!("Failed to create dataset.yaml: {}", e);
        }
    }
}

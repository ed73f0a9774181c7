use std::path::{Path, PathBuf};

use unredact::{
    BatchConfig, BatchReport, FileQueue, LayoutMode, TimestampedLog, WordOptions, process_batch,
};

/// Exit code for a bad command line or unusable output directory.
const CONFIG_ERROR: i32 = 2;

pub fn run(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    mode: LayoutMode,
    words: WordOptions,
    recursive: bool,
    report_path: Option<&Path>,
) -> Result<(), i32> {
    let queue = build_queue(inputs, recursive)?;
    let config = BatchConfig {
        output_dir: output_dir.map(Path::to_path_buf),
        mode,
        words,
        ..BatchConfig::default()
    };

    let mut log = TimestampedLog::new(std::io::stdout().lock());
    let report = process_batch(&queue, &config, &mut log).map_err(|e| {
        eprintln!("Error: {e}");
        CONFIG_ERROR
    })?;
    drop(log);

    if let Some(path) = report_path {
        write_report(&report, path)?;
    }

    if report.failed() > 0 {
        eprintln!(
            "{} of {} files failed",
            report.failed(),
            report.outcomes.len()
        );
        return Err(1);
    }
    Ok(())
}

/// Files go in as given; directories are scanned for PDFs.
fn build_queue(inputs: &[PathBuf], recursive: bool) -> Result<FileQueue, i32> {
    let mut queue = FileQueue::new();
    for input in inputs {
        if input.is_dir() {
            let added = queue.add_folder(input, recursive).map_err(|e| {
                eprintln!("Error: cannot scan {}: {e}", input.display());
                CONFIG_ERROR
            })?;
            tracing::info!(dir = %input.display(), added, "scanned directory");
        } else {
            queue.add_file(input);
        }
    }
    Ok(queue)
}

fn write_report(report: &BatchReport, path: &Path) -> Result<(), i32> {
    let json = serde_json::to_string_pretty(report).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    std::fs::write(path, json).map_err(|e| {
        eprintln!("Error: cannot write report {}: {e}", path.display());
        1
    })
}

//! Batch driver: run the engine over a queue of files, one at a time, and
//! keep going when a single file fails.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use unredact_core::{ExtractOptions, LayoutMode, WordOptions};

use crate::engine::{ProcessOptions, process_pdf_with};
use crate::scan::collect_pdfs;

/// Ordered input list without duplicates.
#[derive(Debug, Clone, Default)]
pub struct FileQueue {
    files: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl FileQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` unless it is already queued. Returns whether it was added.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.files.push(path);
        true
    }

    /// Append several paths in order. Returns how many were new.
    pub fn add_files<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            if self.add_file(path) {
                added += 1;
            }
        }
        added
    }

    /// Queue every PDF in `dir`, see [`collect_pdfs`].
    ///
    /// # Errors
    ///
    /// Returns the I/O error if `dir` cannot be read.
    pub fn add_folder(&mut self, dir: impl AsRef<Path>, recursive: bool) -> io::Result<usize> {
        Ok(self.add_files(collect_pdfs(dir, recursive)?))
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.files.iter()
    }
}

impl<'a> IntoIterator for &'a FileQueue {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Settings for [`process_batch`].
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Where output files go. Required.
    pub output_dir: Option<PathBuf>,
    pub mode: LayoutMode,
    pub extract: ExtractOptions,
    pub words: WordOptions,
}

impl BatchConfig {
    pub fn new(output_dir: impl Into<PathBuf>, mode: LayoutMode) -> Self {
        Self {
            output_dir: Some(output_dir.into()),
            mode,
            ..Self::default()
        }
    }
}

/// Configuration problems that stop a batch before any file is touched.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("no input files queued")]
    EmptyQueue,

    #[error("no output directory selected")]
    MissingOutputDir,

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result for one queued file: the written path or the failure message.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<PathBuf, String>,
}

/// Per-file outcomes in queue order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Sink for human-readable progress lines.
pub trait ActivityLog {
    fn log(&mut self, line: &str);
}

impl ActivityLog for Vec<String> {
    fn log(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

/// Writes each line prefixed with the local time as `[HH:MM:SS] `.
#[derive(Debug)]
pub struct TimestampedLog<W: Write> {
    out: W,
}

impl<W: Write> TimestampedLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ActivityLog for TimestampedLog<W> {
    fn log(&mut self, line: &str) {
        let stamp = chrono::Local::now().format("[%H:%M:%S]");
        // A closed pipe must not abort the batch.
        if let Err(e) = writeln!(self.out, "{stamp} {line}") {
            tracing::debug!("activity log write failed: {e}");
        }
    }
}

/// Process every queued file in order.
///
/// Configuration is checked first; a bad configuration processes nothing.
/// After that, a failing file is recorded in the report and logged, and the
/// batch moves on to the next one.
///
/// # Errors
///
/// Returns [`BatchError`] for an empty queue, a missing output directory or
/// one that cannot be created.
pub fn process_batch(
    queue: &FileQueue,
    config: &BatchConfig,
    log: &mut dyn ActivityLog,
) -> Result<BatchReport, BatchError> {
    if queue.is_empty() {
        return Err(BatchError::EmptyQueue);
    }
    let output_dir = config
        .output_dir
        .as_deref()
        .ok_or(BatchError::MissingOutputDir)?;
    std::fs::create_dir_all(output_dir).map_err(|source| BatchError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let options = ProcessOptions {
        extract: config.extract.clone(),
        words: config.words.clone(),
    };
    let mut report = BatchReport::default();

    for input in queue {
        let name = input
            .file_name()
            .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
        emit(log, &format!("Processing: {name}"));

        let result = process_pdf_with(input, output_dir, config.mode, &options).map_err(|e| {
            let message = e.to_string();
            tracing::error!(input = %input.display(), "{message}");
            log.log(&format!("Error: {message}"));
            message
        });
        report.outcomes.push(FileOutcome {
            input: input.clone(),
            result,
        });
    }

    emit(log, "BATCH COMPLETE.");
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch finished"
    );
    Ok(report)
}

fn emit(log: &mut dyn ActivityLog, line: &str) {
    tracing::info!("{line}");
    log.log(line);
}

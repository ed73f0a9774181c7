//! The per-file engine: extract lines from every page of one PDF and write
//! the composite document next to the others in an output directory.

use std::path::{Path, PathBuf};

use unredact_core::{ExtractOptions, LayoutMode, PdfError, WordOptions};

use crate::Pdf;

/// Prefix of every output file name.
pub const OUTPUT_PREFIX: &str = "UNREDACTED_";

/// Extraction settings used by [`process_pdf_with`].
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub extract: ExtractOptions,
    pub words: WordOptions,
}

/// `<output_dir>/UNREDACTED_<file name of input>`.
///
/// # Errors
///
/// Returns [`PdfError::IoError`] if `input` has no file name.
pub fn output_path_for(input: &Path, output_dir: &Path) -> Result<PathBuf, PdfError> {
    let name = input
        .file_name()
        .ok_or_else(|| PdfError::IoError(format!("{} has no file name", input.display())))?;
    let mut output_name = std::ffi::OsString::from(OUTPUT_PREFIX);
    output_name.push(name);
    Ok(output_dir.join(output_name))
}

/// Process one PDF with default extraction settings.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Any failure to read, parse or write aborts this file only; nothing is
/// left half-written except when the final write itself fails.
pub fn process_pdf(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    mode: LayoutMode,
) -> Result<PathBuf, PdfError> {
    process_pdf_with(input, output_dir, mode, &ProcessOptions::default())
}

/// Process one PDF with explicit extraction settings.
///
/// # Errors
///
/// See [`process_pdf`].
pub fn process_pdf_with(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    mode: LayoutMode,
    options: &ProcessOptions,
) -> Result<PathBuf, PdfError> {
    let input = input.as_ref();
    let _span = tracing::info_span!("process_pdf", input = %input.display(), %mode).entered();

    let output = output_path_for(input, output_dir.as_ref())?;
    let pdf = Pdf::open_file(input, Some(options.extract.clone()))?;
    let compositor = pdf.compose(mode, &options.words)?;
    let pages = compositor.page_count();
    compositor.save(&output)?;

    tracing::info!(output = %output.display(), pages, "wrote composite");
    Ok(output)
}

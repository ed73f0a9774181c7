use std::path::Path;

use tracing_subscriber::EnvFilter;
use unredact::{Pdf, WordOptions};

use crate::cli::WordArgs;
use crate::page_range::parse_page_range;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` picks the level.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Tests may install a subscriber first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Open a PDF file, printing a user-facing message on failure.
pub fn open_pdf(file: &Path) -> Result<Pdf, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    Pdf::open_file(file, None).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// 0-based page indices for an optional `--pages` argument.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

pub fn word_options(args: WordArgs) -> WordOptions {
    WordOptions {
        x_tolerance: args.x_tolerance,
        y_tolerance: args.y_tolerance,
        ..WordOptions::default()
    }
}

/// Quote a CSV field when it contains a separator, quote or newline.
pub fn csv_escape(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Print a JSON value on one line.
pub fn print_json(value: &serde_json::Value) -> Result<(), i32> {
    let text = serde_json::to_string(value).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escape_leaves_plain_text() {
        assert_eq!(csv_escape("REDACTED SECRET"), "REDACTED SECRET");
        assert_eq!(csv_escape(""), "");
    }

    #[test]
    fn csv_escape_quotes_special_fields() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("l1\nl2"), "\"l1\nl2\"");
    }

    #[test]
    fn missing_file_exits_with_one() {
        assert_eq!(open_pdf(Path::new("/nonexistent/file.pdf")).unwrap_err(), 1);
    }

    #[test]
    fn all_pages_without_range() {
        assert_eq!(resolve_pages(None, 3).unwrap(), vec![0, 1, 2]);
        assert_eq!(resolve_pages(Some("2-3"), 3).unwrap(), vec![1, 2]);
        assert_eq!(resolve_pages(Some("4"), 3).unwrap_err(), 1);
    }

    #[test]
    fn tolerances_reach_word_options() {
        let opts = word_options(WordArgs {
            x_tolerance: 1.5,
            y_tolerance: 2.0,
        });
        assert_eq!(opts.x_tolerance, 1.5);
        assert_eq!(opts.y_tolerance, 2.0);
        assert!(opts.split_on_size);
    }
}

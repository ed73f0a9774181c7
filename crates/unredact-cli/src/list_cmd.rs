use std::path::Path;

use unredact::{Pdf, list_pdfs};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, print_json};

/// List the PDFs in `dir`. A file that fails to open is shown as
/// `unreadable` and the listing goes on.
pub fn run(dir: &Path, format: OutputFormat) -> Result<(), i32> {
    let files = list_pdfs(dir).map_err(|e| {
        eprintln!("Error: cannot read directory {}: {e}", dir.display());
        1
    })?;

    let entries: Vec<(String, Result<usize, String>)> = files
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            let pages = Pdf::open_file(path, None)
                .map(|pdf| pdf.page_count())
                .map_err(|e| {
                    tracing::debug!(file = %path.display(), "cannot open: {e}");
                    e.to_string()
                });
            (name, pages)
        })
        .collect();

    match format {
        OutputFormat::Text => {
            for (name, pages) in &entries {
                match pages {
                    Ok(n) => println!("{name}\t{n}"),
                    Err(_) => println!("{name}\tunreadable"),
                }
            }
            Ok(())
        }
        OutputFormat::Csv => {
            println!("file,pages");
            for (name, pages) in &entries {
                let pages = pages
                    .as_ref()
                    .map_or_else(|_| "unreadable".to_string(), usize::to_string);
                println!("{},{pages}", csv_escape(name));
            }
            Ok(())
        }
        OutputFormat::Json => {
            let rows: Vec<_> = entries
                .iter()
                .map(|(name, pages)| match pages {
                    Ok(n) => serde_json::json!({ "file": name, "pages": n }),
                    Err(e) => serde_json::json!({ "file": name, "pages": null, "error": e }),
                })
                .collect();
            print_json(&serde_json::Value::Array(rows))
        }
    }
}

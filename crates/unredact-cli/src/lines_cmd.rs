use std::path::Path;

use unredact::{LineRecord, Pdf, WordOptions};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, open_pdf, print_json, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: OutputFormat,
    opts: &WordOptions,
) -> Result<(), i32> {
    let pdf = open_pdf(file)?;
    let page_indices = resolve_pages(pages, pdf.page_count())?;
    let records = collect(&pdf, &page_indices, opts)?;

    match format {
        OutputFormat::Text => {
            println!("page\tx0\ttop\tsize\ttext");
            for (page, r) in &records {
                println!("{page}\t{:.2}\t{:.2}\t{:.2}\t{}", r.x0, r.top, r.size, r.text);
            }
            Ok(())
        }
        OutputFormat::Csv => {
            println!("page,x0,top,size,text");
            for (page, r) in &records {
                println!(
                    "{page},{:.2},{:.2},{:.2},{}",
                    r.x0,
                    r.top,
                    r.size,
                    csv_escape(&r.text)
                );
            }
            Ok(())
        }
        OutputFormat::Json => {
            let rows: Vec<_> = records
                .iter()
                .map(|(page, r)| {
                    serde_json::json!({
                        "page": page,
                        "x0": r.x0,
                        "top": r.top,
                        "size": r.size,
                        "text": r.text,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(rows))
        }
    }
}

/// `(1-based page number, record)` for every selected page.
fn collect(
    pdf: &Pdf,
    page_indices: &[usize],
    opts: &WordOptions,
) -> Result<Vec<(usize, LineRecord)>, i32> {
    let mut out = Vec::new();
    for &idx in page_indices {
        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        out.extend(
            page.line_records(opts)
                .into_iter()
                .map(|record| (idx + 1, record)),
        );
    }
    Ok(out)
}

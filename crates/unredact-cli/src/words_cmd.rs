use std::path::Path;

use unredact::{Pdf, Word, WordOptions};

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

    match format {
        OutputFormat::Text => {
            println!("page\tx0\ttop\tx1\tbottom\tsize\ttext");
            for_each_word(&pdf, &page_indices, opts, |page, w| {
                println!(
                    "{page}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}\t{}",
                    w.bbox.x0,
                    w.bbox.top,
                    w.bbox.x1,
                    w.bbox.bottom,
                    size_text(w),
                    w.text
                );
            })
        }
        OutputFormat::Csv => {
            println!("page,x0,top,x1,bottom,size,text");
            for_each_word(&pdf, &page_indices, opts, |page, w| {
                println!(
                    "{page},{:.2},{:.2},{:.2},{:.2},{},{}",
                    w.bbox.x0,
                    w.bbox.top,
                    w.bbox.x1,
                    w.bbox.bottom,
                    size_text(w),
                    csv_escape(&w.text)
                );
            })
        }
        OutputFormat::Json => {
            let mut rows = Vec::new();
            for_each_word(&pdf, &page_indices, opts, |page, w| {
                rows.push(serde_json::json!({
                    "page": page,
                    "x0": w.bbox.x0,
                    "top": w.bbox.top,
                    "x1": w.bbox.x1,
                    "bottom": w.bbox.bottom,
                    "size": w.size,
                    "text": w.text,
                }));
            })?;
            print_json(&serde_json::Value::Array(rows))
        }
    }
}

fn size_text(word: &Word) -> String {
    word.size.map_or_else(String::new, |s| format!("{s:.2}"))
}

fn for_each_word(
    pdf: &Pdf,
    page_indices: &[usize],
    opts: &WordOptions,
    mut f: impl FnMut(usize, &Word),
) -> Result<(), i32> {
    for &idx in page_indices {
        let page = pdf.page(idx).map_err(|e| {
            eprintln!("Error reading page {}: {e}", idx + 1);
            1
        })?;
        for word in page.extract_words(opts) {
            f(idx + 1, &word);
        }
    }
    Ok(())
}

//! Locating PDF files on disk.

use std::io;
use std::path::{Path, PathBuf};

/// True when the extension is `pdf` in any case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Every regular PDF file under `dir`, sorted by path.
///
/// Subdirectories are walked only when `recursive` is set. Entries that
/// vanish or cannot be stat'ed during the walk are skipped.
///
/// # Errors
///
/// Returns the I/O error if `dir` itself cannot be read.
pub fn collect_pdfs(dir: impl AsRef<Path>, recursive: bool) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(dir.as_ref(), recursive, &mut found, true)?;
    found.sort();
    Ok(found)
}

/// Non-recursive sorted listing, for browsing an output directory.
///
/// # Errors
///
/// Returns the I/O error if `dir` cannot be read.
pub fn list_pdfs(dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    collect_pdfs(dir, false)
}

fn walk(dir: &Path, recursive: bool, found: &mut Vec<PathBuf>, root: bool) -> io::Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if root => return Err(e),
        Err(e) => {
            tracing::debug!(dir = %dir.display(), "skipping unreadable directory: {e}");
            return Ok(());
        }
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        if file_type.is_dir() {
            if recursive {
                walk(&path, recursive, found, false)?;
            }
        } else if is_pdf(&path) && path.is_file() {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"%PDF-1.5\n").unwrap();
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(is_pdf(Path::new("a.pdf")));
        assert!(is_pdf(Path::new("a.PDF")));
        assert!(is_pdf(Path::new("dir/a.Pdf")));
        assert!(!is_pdf(Path::new("a.pdf.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn flat_and_recursive_scans() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        touch(&dir.path().join("b.pdf"));
        touch(&dir.path().join("a.PDF"));
        touch(&dir.path().join("notes.txt"));
        touch(&sub.join("c.pdf"));

        let flat = collect_pdfs(dir.path(), false).unwrap();
        assert_eq!(
            flat,
            vec![dir.path().join("a.PDF"), dir.path().join("b.pdf")]
        );

        let deep = collect_pdfs(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&sub.join("c.pdf")));
    }

    #[test]
    fn directory_named_like_a_pdf_is_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("folder.pdf")).unwrap();
        assert!(list_pdfs(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(collect_pdfs("/nonexistent/unredact/scan", true).is_err());
    }
}

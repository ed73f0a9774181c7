//! Integration tests for the `lines`, `words` and `list` subcommands.

mod common;

use common::{cmd, pdf_with_pages, redacted_pdf, write};
use predicates::prelude::*;

#[test]
fn lines_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "memo.pdf", &redacted_pdf());

    cmd()
        .arg("lines")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("page\tx0\ttop\tsize\ttext\n"))
        .stdout(predicate::str::contains(
            "1\t50.00\t100.00\t12.00\tREDACTED SECRET",
        ));
}

#[test]
fn lines_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "memo.pdf", &redacted_pdf());

    let output = cmd()
        .arg("lines")
        .arg(&input)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["page"], 1);
    assert_eq!(rows[0]["text"], "REDACTED SECRET");
}

#[test]
fn lines_respects_page_selection() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(
        dir.path(),
        "pages.pdf",
        &pdf_with_pages(&[&[(20.0, 300.0, "first")], &[(20.0, 300.0, "second")]]),
    );

    cmd()
        .arg("lines")
        .arg(&input)
        .args(["--pages", "2", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2,20.00,").and(predicate::str::contains("second")))
        .stdout(predicate::str::contains("first").not());
}

#[test]
fn lines_rejects_out_of_range_pages() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "memo.pdf", &redacted_pdf());

    cmd()
        .arg("lines")
        .arg(&input)
        .args(["--pages", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("exceeds"));
}

#[test]
fn words_are_listed_separately() {
    let dir = tempfile::tempdir().unwrap();
    let input = write(dir.path(), "memo.pdf", &redacted_pdf());

    cmd()
        .arg("words")
        .arg(&input)
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("page,x0,top,x1,bottom,size,text\n"))
        .stdout(predicate::str::contains(",12.00,REDACTED\n"))
        .stdout(predicate::str::contains(",12.00,SECRET\n"));
}

#[test]
fn words_missing_file() {
    cmd()
        .args(["words", "/nonexistent/memo.pdf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn list_marks_unreadable_files_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.pdf", &redacted_pdf());
    write(dir.path(), "b.pdf", b"broken");
    write(
        dir.path(),
        "c.pdf",
        &pdf_with_pages(&[&[], &[], &[(1.0, 1.0, "x")]]),
    );
    write(dir.path(), "d.txt", b"ignored");

    cmd()
        .arg("list")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("a.pdf\t1\nb.pdf\tunreadable\nc.pdf\t3\n");
}

#[test]
fn list_missing_directory() {
    cmd()
        .args(["list", "/nonexistent/unredact/dir"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read directory"));
}

//! Batch driver and directory scanning against real files on disk.

mod common;

use common::{FixturePage, redacted_page, write_pdf};
use unredact::{
    ActivityLog, BatchConfig, BatchError, FileQueue, LayoutMode, TimestampedLog, collect_pdfs,
    list_pdfs, process_batch,
};

#[test]
fn batch_continues_after_a_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_pdf(dir.path(), "a_good.pdf", &[redacted_page()]);
    let bad = dir.path().join("b_bad.pdf");
    std::fs::write(&bad, b"garbage").unwrap();
    let also_good = write_pdf(dir.path(), "c_good.pdf", &[FixturePage::new(100, 100)]);

    let mut queue = FileQueue::new();
    queue.add_files([good, bad.clone(), also_good]);
    let out = dir.path().join("out");
    let mut log: Vec<String> = Vec::new();

    let report = process_batch(&queue, &BatchConfig::new(&out, LayoutMode::SideBySide), &mut log)
        .unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.outcomes[1].input, bad);
    assert!(report.outcomes[1].result.is_err());
    assert_eq!(
        report.outcomes[2].result.as_ref().unwrap(),
        &out.join("UNREDACTED_c_good.pdf")
    );
    assert!(out.join("UNREDACTED_a_good.pdf").is_file());
    assert!(!out.join("UNREDACTED_b_bad.pdf").exists());

    assert_eq!(log[0], "Processing: a_good.pdf");
    assert_eq!(log[1], "Processing: b_bad.pdf");
    assert!(log[2].starts_with("Error: "), "{log:?}");
    assert_eq!(log[3], "Processing: c_good.pdf");
    assert_eq!(log[4], "BATCH COMPLETE.");
    assert_eq!(log.len(), 5);
}

#[test]
fn configuration_errors_process_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "memo.pdf", &[redacted_page()]);
    let mut queue = FileQueue::new();
    queue.add_file(&input);

    let mut log: Vec<String> = Vec::new();
    let missing = BatchConfig {
        output_dir: None,
        ..BatchConfig::default()
    };
    assert!(matches!(
        process_batch(&queue, &missing, &mut log),
        Err(BatchError::MissingOutputDir)
    ));

    let config = BatchConfig::new(dir.path().join("out"), LayoutMode::SideBySide);
    assert!(matches!(
        process_batch(&FileQueue::new(), &config, &mut log),
        Err(BatchError::EmptyQueue)
    ));
    assert!(log.is_empty());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn folder_scan_feeds_the_queue() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_pdf(dir.path(), "top.pdf", &[redacted_page()]);
    write_pdf(&nested, "DEEP.PDF", &[redacted_page()]);
    std::fs::write(dir.path().join("readme.txt"), b"not a pdf").unwrap();

    let mut queue = FileQueue::new();
    assert_eq!(queue.add_folder(dir.path(), false).unwrap(), 1);
    assert_eq!(queue.add_folder(dir.path(), true).unwrap(), 1);
    assert_eq!(queue.len(), 2);

    let out = dir.path().join("out");
    let mut log: Vec<String> = Vec::new();
    let report =
        process_batch(&queue, &BatchConfig::new(&out, LayoutMode::OverlayWhite), &mut log).unwrap();
    assert_eq!(report.failed(), 0);

    let written = list_pdfs(&out).unwrap();
    assert_eq!(
        written,
        vec![out.join("UNREDACTED_DEEP.PDF"), out.join("UNREDACTED_top.pdf")]
    );
    assert_eq!(collect_pdfs(dir.path(), true).unwrap().len(), 4);
}

#[test]
fn timestamped_log_prefixes_each_line() {
    let mut log = TimestampedLog::new(Vec::new());
    log.log("Processing: a.pdf");
    log.log("BATCH COMPLETE.");
    let text = String::from_utf8(log.into_inner()).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let bytes = line.as_bytes();
        assert_eq!(bytes[0], b'[');
        assert_eq!(bytes[3], b':');
        assert_eq!(bytes[6], b':');
        assert_eq!(&line[9..11], "] ");
    }
    assert!(lines[1].ends_with("BATCH COMPLETE."));
}

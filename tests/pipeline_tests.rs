use econbot::corpus;
use econbot::prelude::*;
use econbot::processor::{AlwaysConfirm, BatchProcessor, NeverConfirm};
use std::fs;
use std::path::Path;

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write test file");
}

fn relevant_record(url: &str) -> Record {
    Record::new(
        "Plant Expansion Creating 200 Jobs",
        "The company will begin hiring this fall.",
        url,
        "2024-03-01",
    )
}

fn irrelevant_record(url: &str) -> Record {
    Record::new(
        "Local Bakery Wins Pie Contest",
        "The annual contest drew dozens of entries.",
        url,
        "2024-03-02",
    )
}

fn backup_files(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("corpus.json.backup-"))
        .collect()
}

#[test]
fn load_dir_repairs_what_it_can_and_placeholders_the_rest() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(
        dir.path(),
        "a_valid.json",
        r#"{"title":"Valid","content":"Body","url":"https://example.com/a","date":"2024-03-01"}"#,
    );
    write_file(
        dir.path(),
        "b_malformed.json",
        r#"{title: "Fixable", content: "Body", url: "https://example.com/b", date: "2024-03-02",}"#,
    );
    write_file(dir.path(), "c_garbage.json", "%%% not a record %%%");

    let records = corpus::load_dir(dir.path()).expect("load dir");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].title, "Valid");
    assert_eq!(records[1].title, "Fixable");
    assert_eq!(records[2].url, "recovered://c_garbage");
}

#[test]
fn load_file_recovers_damaged_elements() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(
        dir.path(),
        "batch.json",
        r#"[
  {"title":"Good","content":"Body","url":"https://example.com/good","date":"2024-03-01"},
  {"title":"Broken","content":"Missing the rest"}
]"#,
    );

    let records = corpus::load_file(&dir.path().join("batch.json")).expect("load file");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Good");
    assert!(records[1].url.starts_with("recovered://"));
}

#[test]
fn save_and_load_roundtrip_preserves_optional_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("corpus.json");

    let mut record = relevant_record("https://example.com/r");
    record.city = Some("Springfield".to_string());
    record.state = Some("IL".to_string());

    corpus::save_file(&path, &[record.clone()]).expect("save");

    // Pretty-printed 2-space array on disk
    let on_disk = fs::read_to_string(&path).expect("read corpus");
    assert!(on_disk.starts_with("[\n  {"));

    let loaded = corpus::load_file(&path).expect("load");
    assert_eq!(loaded, vec![record]);
}

#[tokio::test]
async fn keyword_run_partitions_in_input_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ConfigBuilder::new(dir.path(), dir.path().join("corpus.json"))
        .strategy(Strategy::Keyword)
        .build()
        .expect("config");

    let records = vec![
        relevant_record("https://example.com/1"),
        irrelevant_record("https://example.com/2"),
        relevant_record("https://example.com/3"),
    ];

    let outcome = BatchProcessor::new(config)
        .run(records)
        .await
        .expect("run");

    let accepted: Vec<&str> = outcome.accepted.iter().map(|r| r.url.as_str()).collect();
    let rejected: Vec<&str> = outcome.rejected.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(accepted, vec!["https://example.com/1", "https://example.com/3"]);
    assert_eq!(rejected, vec!["https://example.com/2"]);

    assert_eq!(outcome.log.len(), 3);
    assert!(outcome.log.iter().all(|d| d.source == DecisionSource::Keyword));
    let verdicts: Vec<bool> = outcome.log.iter().map(|d| d.relevant).collect();
    assert_eq!(verdicts, vec![true, false, true]);
}

#[tokio::test]
async fn declining_confirmation_leaves_corpus_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let corpus_path = dir.path().join("corpus.json");
    let original = r#"[{"title":"Old","content":"Body","url":"https://example.com/old","date":"2024-01-01"}]"#;
    fs::write(&corpus_path, original).expect("seed corpus");

    let config = ConfigBuilder::new(dir.path(), &corpus_path)
        .build()
        .expect("config");
    let processor = BatchProcessor::new(config);
    let outcome = processor
        .run(vec![relevant_record("https://example.com/new")])
        .await
        .expect("run");

    let status = processor.commit(&outcome, &NeverConfirm).expect("commit");
    assert_eq!(status, CommitStatus::Declined);

    // Corpus byte-identical; backup was still taken before the prompt
    assert_eq!(fs::read_to_string(&corpus_path).expect("read"), original);
    assert_eq!(backup_files(dir.path()).len(), 1);
}

#[tokio::test]
async fn confirmed_commit_backs_up_then_replaces_corpus() {
    let dir = tempfile::tempdir().expect("tempdir");
    let corpus_path = dir.path().join("corpus.json");
    let original = r#"[{"title":"Old","content":"Body","url":"https://example.com/old","date":"2024-01-01"}]"#;
    fs::write(&corpus_path, original).expect("seed corpus");

    let config = ConfigBuilder::new(dir.path(), &corpus_path)
        .build()
        .expect("config");
    let processor = BatchProcessor::new(config);
    let outcome = processor
        .run(vec![
            relevant_record("https://example.com/new"),
            irrelevant_record("https://example.com/skip"),
        ])
        .await
        .expect("run");

    let status = processor.commit(&outcome, &AlwaysConfirm).expect("commit");
    let backup = match status {
        CommitStatus::Committed { backup: Some(path) } => path,
        other => panic!("expected committed with backup, got {:?}", other),
    };

    // Backup holds the prior corpus
    assert_eq!(fs::read_to_string(&backup).expect("read backup"), original);

    // The corpus of record is now the accepted set only
    let corpus_now = corpus::load_file(&corpus_path).expect("load corpus");
    assert_eq!(corpus_now.len(), 1);
    assert_eq!(corpus_now[0].url, "https://example.com/new");

    // Audit log written next to the corpus, one entry per input record
    let log_raw = fs::read_to_string(dir.path().join("analysis-log.json")).expect("read log");
    let log: Vec<serde_json::Value> = serde_json::from_str(&log_raw).expect("parse log");
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["url"], "https://example.com/new");
    assert_eq!(log[0]["relevant"], true);
    assert_eq!(log[0]["source"], "keyword");
    assert_eq!(log[1]["relevant"], false);
}

#[tokio::test]
async fn first_commit_creates_corpus_without_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let corpus_path = dir.path().join("corpus.json");

    let config = ConfigBuilder::new(dir.path(), &corpus_path)
        .build()
        .expect("config");
    let processor = BatchProcessor::new(config);
    let outcome = processor
        .run(vec![relevant_record("https://example.com/first")])
        .await
        .expect("run");

    let status = processor.commit(&outcome, &AlwaysConfirm).expect("commit");
    assert_eq!(status, CommitStatus::Committed { backup: None });
    assert!(corpus_path.exists());
    assert!(backup_files(dir.path()).is_empty());
}

#[tokio::test]
async fn limit_caps_processed_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ConfigBuilder::new(dir.path(), dir.path().join("corpus.json"))
        .limit(1)
        .build()
        .expect("config");

    let outcome = BatchProcessor::new(config)
        .run(vec![
            relevant_record("https://example.com/1"),
            relevant_record("https://example.com/2"),
        ])
        .await
        .expect("run");

    assert_eq!(outcome.accepted.len() + outcome.rejected.len(), 1);
    assert_eq!(outcome.log.len(), 1);
}

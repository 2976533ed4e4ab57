use crate::error::{Error, Result};
use crate::repair::{self, RepairContext};
use crate::types::{Record, RepairOutcome};
use crate::validator;
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Load records from either corpus layout: a category directory of
/// one-file-per-record, or a single aggregate array file
pub fn load_input(path: &Path) -> Result<Vec<Record>> {
    if path.is_dir() {
        load_dir(path)
    } else {
        load_file(path)
    }
}

/// Read every `*.json` record file in a category directory, passing each
/// through the repair engine. Collection order is sorted filename order.
pub fn load_dir(dir: &Path) -> Result<Vec<Record>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();

    let mut records = Vec::new();
    for path in paths {
        let raw = fs::read_to_string(&path)?;
        let ctx = RepairContext::from_path(&path);
        records.push(report_outcome(repair::repair(&raw, &ctx), &path.display().to_string()));
    }
    Ok(records)
}

/// Read an aggregate array file. Elements that fail validation go through
/// the repair engine, so a partially damaged array still loads.
pub fn load_file(path: &Path) -> Result<Vec<Record>> {
    let raw = fs::read_to_string(path)?;
    let parsed = serde_json::from_str::<serde_json::Value>(&raw)
        .or_else(|_| serde_json::from_str(&repair::apply_fixes(&raw)))?;

    let elements = match parsed {
        serde_json::Value::Array(items) => items,
        single @ serde_json::Value::Object(_) => vec![single],
        _ => {
            return Err(Error::Persistence(format!(
                "Corpus file is not an array of records: {}",
                path.display()
            )))
        }
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "corpus".to_string());

    let mut records = Vec::new();
    for (idx, element) in elements.into_iter().enumerate() {
        match validator::parse_record(&element) {
            Some(record) => records.push(record),
            None => {
                let ctx = RepairContext::new(format!("{}#{}", stem, idx));
                let label = format!("{} (element {})", path.display(), idx);
                records.push(report_outcome(repair::repair(&element.to_string(), &ctx), &label));
            }
        }
    }
    Ok(records)
}

/// Every repaired or placeholder-replaced record is reported individually
fn report_outcome(outcome: RepairOutcome, source: &str) -> Record {
    match outcome {
        RepairOutcome::Unchanged(record) => record,
        RepairOutcome::Repaired(record) => {
            eprintln!("✓ Repaired malformed record: {}", source);
            record
        }
        RepairOutcome::PlaceholderCreated(record) => {
            eprintln!("✗ Replaced unrecoverable record with placeholder: {}", source);
            record
        }
    }
}

/// Write a corpus file: pretty-printed 2-space JSON array, UTF-8,
/// all-or-nothing via temp file plus rename
pub fn save_file(path: &Path, records: &[Record]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| {
        Error::Persistence(format!("Failed to write {}: {}", tmp.display(), e))
    })?;
    fs::rename(&tmp, path).map_err(|e| {
        Error::Persistence(format!("Failed to replace {}: {}", path.display(), e))
    })
}

/// Copy the current corpus to a timestamped backup next to it. Returns the
/// backup path, or None when there is no corpus file to protect yet.
pub fn backup(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "corpus.json".to_string());
    let backup_path = path.with_file_name(format!("{}.backup-{}", file_name, stamp));
    fs::copy(path, &backup_path).map_err(|e| {
        Error::Persistence(format!(
            "Failed to back up {} to {}: {}",
            path.display(),
            backup_path.display(),
            e
        ))
    })?;
    Ok(Some(backup_path))
}

/// Keyed merge by `url`: duplicate URLs overwrite rather than duplicate.
/// First-seen order is preserved for retained keys; new keys append in
/// input order.
pub fn merge_keyed(existing: Vec<Record>, incoming: Vec<Record>) -> Vec<Record> {
    let mut order: Vec<String> = Vec::new();
    let mut by_url: HashMap<String, Record> = HashMap::new();

    for record in existing.into_iter().chain(incoming) {
        if !by_url.contains_key(&record.url) {
            order.push(record.url.clone());
        }
        by_url.insert(record.url.clone(), record);
    }

    order
        .into_iter()
        .filter_map(|url| by_url.remove(&url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, title: &str) -> Record {
        Record::new(title, "content", url, "2024-03-01")
    }

    #[test]
    fn test_merge_keyed_overwrites_duplicates() {
        let existing = vec![record("https://a", "old A"), record("https://b", "B")];
        let incoming = vec![record("https://a", "new A"), record("https://c", "C")];

        let merged = merge_keyed(existing, incoming);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].url, "https://a");
        assert_eq!(merged[0].title, "new A");
        assert_eq!(merged[1].url, "https://b");
        assert_eq!(merged[2].url, "https://c");
    }

    #[test]
    fn test_merge_keyed_dedups_within_one_batch() {
        let incoming = vec![record("https://a", "first"), record("https://a", "second")];
        let merged = merge_keyed(Vec::new(), incoming);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "second");
    }
}

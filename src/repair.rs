use crate::types::{Record, RepairOutcome};
use crate::validator;
use chrono::Utc;
use regex::Regex;
use std::path::Path;

/// Where a raw record came from, for placeholder synthesis
#[derive(Debug, Clone)]
pub struct RepairContext {
    /// Identifier of the source, typically the filename stem
    pub source_id: String,
    /// Target category inferred from the directory of origin, when known
    pub category: Option<String>,
}

impl RepairContext {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            category: None,
        }
    }

    pub fn with_category(source_id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            category: Some(category.into()),
        }
    }

    /// Derive source identifier and category from a record file path.
    /// The parent directory name is treated as the category.
    pub fn from_path(path: &Path) -> Self {
        let source_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let category = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string());
        Self {
            source_id,
            category,
        }
    }
}

/// Best-effort recovery of a malformed serialized record.
///
/// Never errors: an already-valid input comes back `Unchanged`, a
/// syntactically repairable one comes back `Repaired`, and anything else is
/// replaced by a synthesized placeholder that passes validation.
pub fn repair(raw: &str, ctx: &RepairContext) -> RepairOutcome {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        if let Some(record) = validator::parse_record(&value) {
            return RepairOutcome::Unchanged(record);
        }
    }

    let fixed = apply_fixes(raw);
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&fixed) {
        if let Some(record) = validator::parse_record(&value) {
            return RepairOutcome::Repaired(record);
        }
    }

    RepairOutcome::PlaceholderCreated(placeholder(raw, ctx))
}

/// Syntactic fixups for the malformations the collection layer produces:
/// trailing separators, unquoted object keys, missing trailing closers.
/// Also applied to whole aggregate files before element-level repair.
pub(crate) fn apply_fixes(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    // 1. Strip trailing separators before closing braces/brackets
    if let Ok(re) = Regex::new(r",\s*([}\]])") {
        text = re.replace_all(&text, "$1").into_owned();
    }

    // 2. Quote unquoted object keys matching a simple identifier pattern
    if let Ok(re) = Regex::new(r#"([{\[,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:"#) {
        text = re.replace_all(&text, "${1}\"${2}\":").into_owned();
    }

    // 3. Append closers for unmatched opening braces/brackets
    for closer in unclosed_delimiters(&text) {
        text.push(closer);
    }

    text
}

/// Scan for opening braces/brackets left unclosed at end of input, skipping
/// string literals. Returns the matching closers in closing order.
fn unclosed_delimiters(text: &str) -> Vec<char> {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&ch) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    stack.reverse();
    stack
}

/// Synthesize a minimal valid record standing in for unrecoverable input
fn placeholder(raw: &str, ctx: &RepairContext) -> Record {
    let category = ctx.category.as_deref().unwrap_or("unknown");
    Record::new(
        format!("Recovered record: {}", ctx.source_id),
        format!(
            "Original content could not be parsed ({} bytes, category: {}).",
            raw.len(),
            category
        ),
        format!("recovered://{}", ctx.source_id),
        Utc::now().date_naive().to_string(),
    )
}

use serde::{Deserialize, Serialize};

/// A single news-style record as produced by the collection layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub content: String,
    pub url: String,
    /// ISO date string (YYYY-MM-DD, or an RFC 3339 timestamp)
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Record {
    /// Create a record with only the required fields set
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
            date: date.into(),
            summary: None,
            city: None,
            state: None,
        }
    }
}

/// Which strategy produced a relevance decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionSource {
    #[serde(rename = "keyword")]
    Keyword,
    #[serde(rename = "ai")]
    Ai,
    #[serde(rename = "ai-fallback-keyword")]
    AiFallbackKeyword,
}

/// Relevance verdict for one record, produced once per classification pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceDecision {
    pub relevant: bool,
    pub explanation: String,
    pub source: DecisionSource,
}

/// Outcome of running a raw serialized record through the repair engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Input already parsed to a valid record; original content untouched
    Unchanged(Record),
    /// Input was malformed but syntactic repair recovered a valid record
    Repaired(Record),
    /// Repair failed; a synthesized placeholder stands in for the original
    PlaceholderCreated(Record),
}

impl RepairOutcome {
    /// The usable record carried by any outcome variant
    pub fn record(&self) -> &Record {
        match self {
            RepairOutcome::Unchanged(r)
            | RepairOutcome::Repaired(r)
            | RepairOutcome::PlaceholderCreated(r) => r,
        }
    }

    pub fn into_record(self) -> Record {
        match self {
            RepairOutcome::Unchanged(r)
            | RepairOutcome::Repaired(r)
            | RepairOutcome::PlaceholderCreated(r) => r,
        }
    }
}

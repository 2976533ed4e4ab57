use crate::ai::AiClassifier;
use crate::classifier::KeywordClassifier;
use crate::config::{Config, Strategy};
use crate::corpus;
use crate::error::Result;
use crate::types::{Record, RelevanceDecision};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Injected confirmation capability gating destructive corpus writes
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Programmatic affirmative confirmation (the `--yes` flag)
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Programmatic declining confirmation
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Interactive y/N prompt on stderr/stdin
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        io::stderr().flush().ok();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Result of one batch run: partitioned records plus the per-record
/// decision log, all in input order
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub accepted: Vec<Record>,
    pub rejected: Vec<Record>,
    pub log: Vec<RelevanceDecision>,
}

/// What `commit` did with the accepted set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStatus {
    Committed { backup: Option<PathBuf> },
    /// Confirmation was declined; the corpus is untouched. Not an error.
    Declined,
}

/// One persisted audit-log line: the record key plus its decision
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisEntry {
    pub url: String,
    pub title: String,
    #[serde(flatten)]
    pub decision: RelevanceDecision,
}

/// Drives a collection of records through the configured classifier,
/// partitions the results, and persists them behind the
/// backup-then-confirm-then-overwrite discipline.
pub struct BatchProcessor {
    config: Config,
}

impl BatchProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Classify a batch. The AI strategy is strictly sequential with a
    /// fixed inter-record delay; the keyword strategy is pure and runs
    /// without pauses. Partitioning preserves relative input order.
    pub async fn run(&self, records: Vec<Record>) -> Result<BatchOutcome> {
        let records: Vec<Record> = match self.config.limit {
            Some(limit) => records.into_iter().take(limit).collect(),
            None => records,
        };
        let total = records.len();

        let mut outcome = BatchOutcome {
            accepted: Vec::new(),
            rejected: Vec::new(),
            log: Vec::new(),
        };

        match self.config.strategy {
            Strategy::Keyword => {
                let classifier = KeywordClassifier::new()?;
                for (idx, record) in records.into_iter().enumerate() {
                    let decision = classifier.decide(&record.title, &record.content);
                    push_decision(&mut outcome, record, decision, idx, total);
                }
            }
            Strategy::Ai => {
                let classifier = AiClassifier::new(self.config.ai.clone())?;
                for (idx, record) in records.into_iter().enumerate() {
                    // Fixed delay between records to respect upstream rate
                    // limits; never concurrent
                    if idx > 0 {
                        tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
                    }
                    let decision = classifier.classify(&record.title, &record.content).await;
                    push_decision(&mut outcome, record, decision, idx, total);
                }
            }
        }

        Ok(outcome)
    }

    /// Persist the accepted set as the corpus of record: write a timestamped
    /// backup of the current corpus, ask for confirmation, then replace the
    /// corpus atomically and write the analysis log next to it. Declining
    /// leaves everything untouched.
    pub fn commit(&self, outcome: &BatchOutcome, confirm: &dyn Confirm) -> Result<CommitStatus> {
        let backup = corpus::backup(&self.config.corpus_file)?;

        let prompt = format!(
            "Overwrite corpus {} with {} accepted records?",
            self.config.corpus_file.display(),
            outcome.accepted.len()
        );
        if !confirm.confirm(&prompt) {
            return Ok(CommitStatus::Declined);
        }

        // Duplicate URLs overwrite, not duplicate, in the corpus of record
        let accepted = corpus::merge_keyed(Vec::new(), outcome.accepted.clone());
        corpus::save_file(&self.config.corpus_file, &accepted)?;

        let log_path = self
            .config
            .corpus_file
            .with_file_name("analysis-log.json");
        let entries = analysis_entries(outcome);
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&log_path, json).map_err(|e| {
            crate::error::Error::Persistence(format!(
                "Failed to write analysis log {}: {}",
                log_path.display(),
                e
            ))
        })?;

        Ok(CommitStatus::Committed { backup })
    }
}

fn push_decision(
    outcome: &mut BatchOutcome,
    record: Record,
    decision: RelevanceDecision,
    idx: usize,
    total: usize,
) {
    let mark = if decision.relevant { "✓" } else { "✗" };
    eprintln!("{} {} ({}/{})", mark, record.title, idx + 1, total);

    if decision.relevant {
        outcome.accepted.push(record);
    } else {
        outcome.rejected.push(record);
    }
    outcome.log.push(decision);
}

/// Pair each decision back up with its record. The log is in input order
/// and each partition preserves input order, so walking both partitions in
/// step reconstructs the original pairing.
fn analysis_entries(outcome: &BatchOutcome) -> Vec<AnalysisEntry> {
    let mut accepted = outcome.accepted.iter();
    let mut rejected = outcome.rejected.iter();

    outcome
        .log
        .iter()
        .filter_map(|decision| {
            let record = if decision.relevant {
                accepted.next()
            } else {
                rejected.next()
            };
            record.map(|r| AnalysisEntry {
                url: r.url.clone(),
                title: r.title.clone(),
                decision: decision.clone(),
            })
        })
        .collect()
}

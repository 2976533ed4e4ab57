//! Classification and repair pipeline for local-news employment signals.
//!
//! This library ingests short news-style records, keeps the on-disk corpus
//! of such records structurally valid, and decides whether each record is
//! relevant to employment and economic development using a layered
//! strategy: a deterministic keyword classifier, and an AI-backed
//! classifier that falls back to the keyword rules on any service failure.

pub mod ai;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod keywords;
pub mod processor;
pub mod repair;
pub mod types;
pub mod validator;

pub use ai::AiClassifier;
pub use classifier::KeywordClassifier;
pub use config::{AiSettings, Config, ConfigBuilder, Strategy};
pub use error::{Error, Result};
pub use processor::{
    AlwaysConfirm, BatchOutcome, BatchProcessor, CommitStatus, Confirm, NeverConfirm,
    StdinConfirm,
};
pub use repair::{repair, RepairContext};
pub use types::{DecisionSource, Record, RelevanceDecision, RepairOutcome};
pub use validator::{validate, Validation};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{AiSettings, Config, ConfigBuilder, Strategy};
    pub use crate::error::{Error, Result};
    pub use crate::processor::{BatchOutcome, BatchProcessor, CommitStatus, Confirm};
    pub use crate::types::{DecisionSource, Record, RelevanceDecision, RepairOutcome};
}

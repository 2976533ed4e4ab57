use clap::{Parser, Subcommand};
use econbot::prelude::*;
use econbot::processor::{AlwaysConfirm, StdinConfirm};
use econbot::{corpus, repair, validator};
use std::fs;
use std::path::PathBuf;

/// Classify news records for employment and economic development relevance
#[derive(Parser, Debug)]
#[command(name = "econbot")]
#[command(about = "Classify and repair local news records")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify records and update the corpus of accepted records
    Classify {
        /// Record source: a category directory or an aggregate array file
        #[arg(long)]
        input: PathBuf,

        /// Corpus file of record (default: corpus.json next to the input)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Classification strategy
        #[arg(long, default_value = "keyword", value_parser = ["keyword", "ai"])]
        strategy: String,

        /// Confirm the corpus overwrite without prompting
        #[arg(long)]
        yes: bool,

        /// Limit number of records processed
        #[arg(long)]
        limit: Option<usize>,

        /// Inter-record delay for the AI strategy, in milliseconds
        #[arg(long = "delay-ms")]
        delay_ms: Option<u64>,

        /// Completion model (can also use ECONBOT_MODEL env var)
        #[arg(long)]
        model: Option<String>,

        /// Completion endpoint (can also use ECONBOT_ENDPOINT env var)
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Repair malformed record files in a category directory
    Repair {
        /// Directory of one-record-per-file JSON
        #[arg(long)]
        input: PathBuf,

        /// Write repaired records back; report-only without this flag
        #[arg(long)]
        write: bool,
    },

    /// Report invalid records without modifying anything
    Validate {
        /// A category directory or an aggregate array file
        #[arg(long)]
        input: PathBuf,
    },
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  classify   Classify records and update the corpus of accepted records");
    println!("  repair     Repair malformed record files in a category directory");
    println!("  validate   Report invalid records without modifying anything");
}

async fn run_classify_command(cmd: Command) -> anyhow::Result<()> {
    let Command::Classify {
        input,
        corpus: corpus_file,
        strategy,
        yes,
        limit,
        delay_ms,
        model,
        endpoint,
    } = cmd
    else {
        unreachable!()
    };

    let corpus_file = corpus_file.unwrap_or_else(|| {
        input
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("corpus.json")
    });

    let mut ai = AiSettings::from_env();
    if let Some(model) = model {
        ai.model = model;
    }
    if let Some(endpoint) = endpoint {
        ai.endpoint = endpoint;
    }

    let mut builder = ConfigBuilder::new(&input, &corpus_file)
        .strategy_str(&strategy)
        .ai(ai);
    if let Some(limit) = limit {
        builder = builder.limit(limit);
    }
    if let Some(delay_ms) = delay_ms {
        builder = builder.delay_ms(delay_ms);
    }
    let config = builder.build()?;

    if config.strategy == Strategy::Ai && config.ai.api_key.is_none() {
        eprintln!("Warning: ECONBOT_API_KEY is not set; AI calls will fall back to keywords");
    }

    let records = corpus::load_input(&input)?;
    eprintln!("Processing {} records...\n", records.len());

    let processor = BatchProcessor::new(config);
    let outcome = processor.run(records).await?;

    println!(
        "\nAccepted: {}  Rejected: {}",
        outcome.accepted.len(),
        outcome.rejected.len()
    );

    let status = if yes {
        processor.commit(&outcome, &AlwaysConfirm)?
    } else {
        processor.commit(&outcome, &StdinConfirm)?
    };

    match status {
        CommitStatus::Committed { backup: Some(path) } => {
            println!("Corpus updated (previous corpus backed up to {})", path.display());
        }
        CommitStatus::Committed { backup: None } => {
            println!("Corpus created: {}", corpus_file.display());
        }
        CommitStatus::Declined => {
            println!("Declined; corpus left untouched");
        }
    }

    Ok(())
}

fn run_repair_command(cmd: Command) -> anyhow::Result<()> {
    let Command::Repair { input, write } = cmd else {
        unreachable!()
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(&input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();

    let mut repaired = 0usize;
    let mut placeholders = 0usize;

    for path in &paths {
        let raw = fs::read_to_string(path)?;
        let ctx = repair::RepairContext::from_path(path);
        match repair::repair(&raw, &ctx) {
            RepairOutcome::Unchanged(_) => {}
            RepairOutcome::Repaired(record) => {
                repaired += 1;
                println!("✓ Repaired  {}", path.display());
                if write {
                    fs::write(path, serde_json::to_string_pretty(&record)?)?;
                }
            }
            RepairOutcome::PlaceholderCreated(record) => {
                placeholders += 1;
                println!("✗ Placeholder  {}", path.display());
                if write {
                    fs::write(path, serde_json::to_string_pretty(&record)?)?;
                }
            }
        }
    }

    println!(
        "\n{} files checked: {} repaired, {} replaced with placeholders{}",
        paths.len(),
        repaired,
        placeholders,
        if write { "" } else { " (report only, use --write to apply)" }
    );

    Ok(())
}

fn run_validate_command(cmd: Command) -> anyhow::Result<()> {
    let Command::Validate { input } = cmd else {
        unreachable!()
    };

    fn report(label: &str, value: &serde_json::Value, total: &mut usize, invalid: &mut usize) {
        *total += 1;
        let result = validator::validate(value);
        if !result.valid {
            *invalid += 1;
            println!("✗ {}  missing: {}", label, result.missing.join(", "));
        }
    }

    let mut invalid = 0usize;
    let mut total = 0usize;

    if input.is_dir() {
        let mut paths: Vec<PathBuf> = fs::read_dir(&input)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
            .collect();
        paths.sort();

        for path in paths {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => {
                    report(&path.display().to_string(), &value, &mut total, &mut invalid)
                }
                Err(e) => {
                    total += 1;
                    invalid += 1;
                    println!("✗ {}  parse error: {}", path.display(), e);
                }
            }
        }
    } else {
        let raw = fs::read_to_string(&input)?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        for (idx, value) in values.iter().enumerate() {
            let label = format!("{} (element {})", input.display(), idx);
            report(&label, value, &mut total, &mut invalid);
        }
    }

    println!("\n{} records checked, {} invalid", total, invalid);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Some(cmd @ Command::Classify { .. }) => run_classify_command(cmd).await,
        Some(cmd @ Command::Repair { .. }) => run_repair_command(cmd),
        Some(cmd @ Command::Validate { .. }) => run_validate_command(cmd),
        None => {
            print_available_commands();
            Ok(())
        }
    }
}
